use std::sync::Arc;

use crate::contact::controller::ContactController;
use crate::content::models::PortfolioContent;
use crate::images::ImageResolver;

/// Shared application state injected into all route handlers via Axum extractors.
/// Per-visitor state (theme, form errors) is never held here.
#[derive(Clone)]
pub struct AppState {
    /// Validated once at startup; read-only afterwards.
    pub content: Arc<PortfolioContent>,
    pub contact: ContactController,
    pub images: ImageResolver,
}
