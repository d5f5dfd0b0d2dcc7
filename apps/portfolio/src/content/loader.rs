use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::contact::validation::is_valid_email;
use crate::content::models::{ImageRef, PortfolioContent};
use crate::images::MAX_DIMENSION;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content file {path} does not match the schema: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid content in {field}: {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ContentError {
    ContentError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

impl PortfolioContent {
    /// Reads and validates the content file. Called once at startup.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::from_json(&raw).map_err(|e| match e {
            ContentError::Parse { source, .. } => ContentError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            "Loaded portfolio content: {} skills, {} projects, {} certifications",
            content.skills.len(),
            content.projects.len(),
            content.certifications.len()
        );
        Ok(content)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let content: PortfolioContent =
            serde_json::from_str(raw).map_err(|source| ContentError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        content.validate()?;
        Ok(content)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let profile = &self.profile;
        if profile.first_name.trim().is_empty() {
            return Err(invalid("profile.first_name", "must not be empty"));
        }
        if !is_valid_email(&profile.email) {
            return Err(invalid(
                "profile.email",
                format!("'{}' is not a valid address", profile.email),
            ));
        }
        require_http("profile.linkedin", &profile.linkedin)?;
        require_http("profile.github", &profile.github)?;

        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(invalid("skills", "skill name must not be empty"));
            }
            if skill.proficiency > 100 {
                return Err(invalid(
                    format!("skills.{}", skill.name),
                    format!("proficiency {} exceeds 100", skill.proficiency),
                ));
            }
        }

        let mut titles = HashSet::new();
        for project in &self.projects {
            let title = project.title.trim();
            if title.is_empty() {
                return Err(invalid("projects", "project title must not be empty"));
            }
            if !titles.insert(title) {
                return Err(invalid(
                    format!("projects.{title}"),
                    "duplicate project title",
                ));
            }
            require_http(&format!("projects.{title}.repository"), &project.repository)?;
        }

        for image in self.image_refs() {
            check_image(image)?;
        }
        Ok(())
    }
}

fn require_http(field: &str, url: &str) -> Result<(), ContentError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(invalid(field, format!("'{url}' is not an http(s) URL")))
    }
}

fn check_image(image: &ImageRef) -> Result<(), ContentError> {
    let field = format!("image {}", image.key);
    if image.key.trim().is_empty() {
        return Err(invalid(field, "key must not be empty"));
    }
    if !(1..=MAX_DIMENSION).contains(&image.width) || !(1..=MAX_DIMENSION).contains(&image.height)
    {
        return Err(invalid(
            field,
            format!("dimensions must be within 1..={MAX_DIMENSION}"),
        ));
    }
    if crate::images::parse_hex_color(&image.placeholder_color).is_none() {
        return Err(invalid(
            field,
            format!("'{}' is not a #rrggbb color", image.placeholder_color),
        ));
    }
    Ok(())
}
