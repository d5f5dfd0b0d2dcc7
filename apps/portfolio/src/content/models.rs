use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER_COLOR: &str = "#5846f6";

/// An image slot on the page. `key` is a path relative to the images dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    pub key: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,
    #[serde(default)]
    pub caption: Option<String>,
}

fn default_placeholder_color() -> String {
    DEFAULT_PLACEHOLDER_COLOR.to_string()
}

impl ImageRef {
    /// URL served by the image route, carrying the placeholder parameters.
    pub fn url(&self) -> String {
        format!(
            "/images/{}?w={}&h={}&color={}",
            self.key,
            self.width,
            self.height,
            self.placeholder_color.replace('#', "%23")
        )
    }

    pub fn caption_text(&self) -> &str {
        self.caption.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub headline: String,
    pub summary: String,
    pub about: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub portrait: ImageRef,
    pub about_image: ImageRef,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub name: String,
    /// Percentage, 0..=100.
    pub proficiency: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub role: String,
    pub organization: String,
    pub period: String,
    pub highlights: Vec<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Accomplishment {
    pub title: String,
    pub icon: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub date: String,
    pub organization: String,
    pub kind: String,
    pub description: String,
    pub details: Vec<String>,
    pub tech: Vec<String>,
    pub repository: String,
    pub image: ImageRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub name: String,
    pub proficiency: String,
    pub icon: String,
}

/// Section banner images, keyed by the section they head.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionImages {
    pub skills: ImageRef,
    pub projects: ImageRef,
    pub education: ImageRef,
}

/// Everything the page displays apart from the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioContent {
    pub page_title: String,
    pub profile: Profile,
    pub section_images: SectionImages,
    pub skills: Vec<Skill>,
    pub soft_skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub accomplishments: Vec<Accomplishment>,
    pub projects_intro: String,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
}

impl PortfolioContent {
    /// Every image slot the page references, in page order.
    pub fn image_refs(&self) -> Vec<&ImageRef> {
        let mut refs = vec![
            &self.profile.portrait,
            &self.profile.about_image,
            &self.section_images.skills,
        ];
        refs.extend(self.experience.iter().filter_map(|e| e.image.as_ref()));
        refs.push(&self.section_images.projects);
        refs.extend(self.projects.iter().map(|p| &p.image));
        refs.push(&self.section_images.education);
        refs
    }
}
