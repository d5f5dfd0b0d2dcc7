//! Image Resolver: serves portfolio images from disk and falls back to a
//! generated solid-color PNG when an asset is missing. Never fails.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::content::models::DEFAULT_PLACEHOLDER_COLOR;

pub const MAX_DIMENSION: u32 = 2000;
const DEFAULT_WIDTH: u32 = 400;
const DEFAULT_HEIGHT: u32 = 300;
/// Distinct placeholders kept in memory. The cache is emptied when full.
const PLACEHOLDER_CACHE_LIMIT: usize = 32;

type PlaceholderKey = (u32, u32, [u8; 3]);

/// Image payload ready to serve.
#[derive(Debug, Clone)]
pub struct ImageBytes {
    pub content_type: &'static str,
    pub bytes: Bytes,
    /// True when the asset was missing and a placeholder was generated.
    pub placeholder: bool,
}

/// Placeholder parameters, taken from the image URL query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceholderSpec {
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub color: Option<String>,
}

impl PlaceholderSpec {
    fn dimensions(&self) -> (u32, u32) {
        let clamp = |v: Option<u32>, default: u32| v.unwrap_or(default).clamp(1, MAX_DIMENSION);
        (clamp(self.w, DEFAULT_WIDTH), clamp(self.h, DEFAULT_HEIGHT))
    }

    fn rgb(&self) -> Rgb<u8> {
        self.color
            .as_deref()
            .and_then(parse_hex_color)
            .or_else(|| parse_hex_color(DEFAULT_PLACEHOLDER_COLOR))
            .map(Rgb)
            .unwrap_or(Rgb([0x58, 0x46, 0xf6]))
    }

    fn cache_key(&self) -> PlaceholderKey {
        let (width, height) = self.dimensions();
        (width, height, self.rgb().0)
    }
}

/// Parses `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    root: PathBuf,
    placeholders: Arc<Mutex<HashMap<PlaceholderKey, Bytes>>>,
}

impl ImageResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            placeholders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Maps a logical key to a file under the images dir. Keys that could
    /// escape the dir resolve to nothing.
    fn asset_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    pub async fn resolve(&self, key: &str, spec: &PlaceholderSpec) -> ImageBytes {
        let Some(path) = self.asset_path(key) else {
            warn!("Rejected image key '{key}'");
            return self.placeholder_for(spec).await;
        };

        match tokio::fs::read(&path).await {
            Ok(data) => ImageBytes {
                content_type: content_type_for(&path),
                bytes: Bytes::from(data),
                placeholder: false,
            },
            Err(e) => {
                debug!("Image {} unavailable ({e}); using placeholder", path.display());
                self.placeholder_for(spec).await
            }
        }
    }

    /// Encodes off the async workers and reuses earlier encodings of the
    /// same size and color.
    async fn placeholder_for(&self, spec: &PlaceholderSpec) -> ImageBytes {
        let key = spec.cache_key();
        let cached = self
            .placeholders
            .lock()
            .ok()
            .and_then(|cache| cache.get(&key).cloned());
        if let Some(bytes) = cached {
            return png_placeholder(bytes);
        }

        let owned = spec.clone();
        let image = match tokio::task::spawn_blocking(move || placeholder(&owned)).await {
            Ok(image) => image,
            Err(e) => {
                warn!("Placeholder task failed: {e}");
                return png_placeholder(Bytes::new());
            }
        };

        if !image.bytes.is_empty() {
            if let Ok(mut cache) = self.placeholders.lock() {
                if cache.len() >= PLACEHOLDER_CACHE_LIMIT {
                    cache.clear();
                }
                cache.insert(key, image.bytes.clone());
            }
        }
        image
    }

    /// Keys with no backing file.
    pub fn missing_assets<'a, I>(&self, keys: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter(|key| {
                self.asset_path(key)
                    .map(|path| !path.is_file())
                    .unwrap_or(true)
            })
            .collect()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Solid-color PNG of the requested size.
pub fn placeholder(spec: &PlaceholderSpec) -> ImageBytes {
    let (width, height) = spec.dimensions();
    let img = RgbImage::from_pixel(width, height, spec.rgb());

    let mut buf = Cursor::new(Vec::new());
    match img.write_to(&mut buf, ImageFormat::Png) {
        Ok(()) => png_placeholder(Bytes::from(buf.into_inner())),
        Err(e) => {
            // Encoding into memory should not fail; serve an empty body rather than error.
            warn!("Failed to encode placeholder image: {e}");
            png_placeholder(Bytes::new())
        }
    }
}

fn png_placeholder(bytes: Bytes) -> ImageBytes {
    ImageBytes {
        content_type: "image/png",
        bytes,
        placeholder: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec(w: u32, h: u32, color: &str) -> PlaceholderSpec {
        PlaceholderSpec {
            w: Some(w),
            h: Some(h),
            color: Some(color.to_string()),
        }
    }

    fn decode(bytes: &Bytes) -> RgbImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .unwrap()
            .to_rgb8()
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#5846f6"), Some([0x58, 0x46, 0xf6]));
        assert_eq!(parse_hex_color("FFFFFF"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("purple"), None);
    }

    #[tokio::test]
    async fn test_existing_asset_is_served() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("work_experience")).unwrap();
        std::fs::write(dir.path().join("work_experience/oppo.jpg"), b"jpeg-bytes").unwrap();
        let resolver = ImageResolver::new(dir.path());

        let image = resolver
            .resolve("work_experience/oppo.jpg", &PlaceholderSpec::default())
            .await;
        assert!(!image.placeholder);
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(&image.bytes[..], b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_missing_asset_gets_sized_placeholder() {
        let dir = TempDir::new().unwrap();
        let resolver = ImageResolver::new(dir.path());

        let image = resolver.resolve("profile.jpeg", &spec(30, 20, "#4a3bf5")).await;
        assert!(image.placeholder);
        assert_eq!(image.content_type, "image/png");
        let decoded = decode(&image.bytes);
        assert_eq!(decoded.dimensions(), (30, 20));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([0x4a, 0x3b, 0xf5]));
    }

    #[tokio::test]
    async fn test_traversal_keys_get_placeholder() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("images");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(dir.path().join("secret.png"), b"secret").unwrap();
        let resolver = ImageResolver::new(&inner);

        for key in ["../secret.png", "/etc/passwd", ""] {
            let image = resolver.resolve(key, &PlaceholderSpec::default()).await;
            assert!(image.placeholder, "{key:?} should not be served");
        }
    }

    #[test]
    fn test_placeholder_defaults_and_clamping() {
        let image = placeholder(&PlaceholderSpec::default());
        assert_eq!(decode(&image.bytes).dimensions(), (400, 300));

        let image = placeholder(&spec(0, 5000, "nonsense"));
        let decoded = decode(&image.bytes);
        assert_eq!(decoded.dimensions(), (1, MAX_DIMENSION));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([0x58, 0x46, 0xf6]));
    }

    #[tokio::test]
    async fn test_repeated_placeholder_is_reused() {
        let dir = TempDir::new().unwrap();
        let resolver = ImageResolver::new(dir.path());

        let first = resolver.resolve("a.png", &spec(50, 40, "#112233")).await;
        let second = resolver.resolve("b.png", &spec(50, 40, "112233")).await;
        assert_eq!(first.bytes.as_ptr(), second.bytes.as_ptr());

        let other = resolver.resolve("a.png", &spec(50, 41, "#112233")).await;
        assert_ne!(first.bytes.as_ptr(), other.bytes.as_ptr());
        assert_eq!(resolver.placeholders.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_placeholder_cache_is_bounded() {
        let dir = TempDir::new().unwrap();
        let resolver = ImageResolver::new(dir.path());

        for w in 1..=(PLACEHOLDER_CACHE_LIMIT as u32 + 8) {
            resolver.resolve("missing.png", &spec(w, 2, "#000000")).await;
        }
        let cached = resolver.placeholders.lock().unwrap().len();
        assert!(cached <= PLACEHOLDER_CACHE_LIMIT, "{cached} cached placeholders");
    }

    #[test]
    fn test_missing_assets_lists_absent_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profile.jpeg"), b"x").unwrap();
        let resolver = ImageResolver::new(dir.path());

        let missing = resolver.missing_assets(["profile.jpeg", "education.jpg", "../x.png"]);
        assert_eq!(missing, vec!["education.jpg", "../x.png"]);
    }
}
