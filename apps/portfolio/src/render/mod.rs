// Content Renderer: askama templates for the page and the notification email.
// Templates live in `templates/` and are compiled into the binary.

pub mod theme;

use askama::Template;
use chrono::{Datelike, Local};

use crate::contact::controller::ContactFormView;
use crate::content::models::PortfolioContent;

pub use theme::{ThemeOption, ThemePalette, ThemeSelection};

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioPage<'a> {
    pub content: &'a PortfolioContent,
    pub palette: ThemePalette,
    pub themes: Vec<ThemeOption>,
    pub form: &'a ContactFormView,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "contact_notification.html")]
pub struct ContactNotificationEmail<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub timestamp: &'a str,
}

/// Renders the full page for one request.
pub fn render_page(
    content: &PortfolioContent,
    theme: ThemeSelection,
    form: &ContactFormView,
) -> Result<String, askama::Error> {
    PortfolioPage {
        content,
        palette: theme.palette(),
        themes: theme.options(),
        form,
        year: Local::now().year(),
    }
    .render()
}
