use std::str::FromStr;

use axum::http::{header, HeaderMap};

pub const THEME_COOKIE: &str = "theme";
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Visitor's color theme. Carried in a cookie and re-applied on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeSelection {
    #[default]
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

/// One entry of the theme picker.
#[derive(Debug, Clone)]
pub struct ThemeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl ThemeSelection {
    pub const ALL: [ThemeSelection; 2] = [ThemeSelection::Blue, ThemeSelection::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSelection::Blue => "blue",
            ThemeSelection::Green => "green",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeSelection::Blue => "Blue",
            ThemeSelection::Green => "Green",
        }
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            ThemeSelection::Blue => ThemePalette {
                bg: "#0a192f",
                text: "#e6f1ff",
                accent: "#64ffda",
            },
            ThemeSelection::Green => ThemePalette {
                bg: "#0f1a0f",
                text: "#e6ffe6",
                accent: "#4dff4d",
            },
        }
    }

    pub fn options(&self) -> Vec<ThemeOption> {
        Self::ALL
            .iter()
            .map(|t| ThemeOption {
                value: t.as_str(),
                label: t.label(),
                selected: t == self,
            })
            .collect()
    }

    /// Reads the theme cookie. Missing or unknown values give the default.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == THEME_COOKIE)
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_cookie(&self) -> String {
        format!(
            "{THEME_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax",
            self.as_str()
        )
    }
}

impl FromStr for ThemeSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(ThemeSelection::Blue),
            "green" => Ok(ThemeSelection::Green),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}
