pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::contact::handlers as contact;
use crate::content::handlers as page;
use crate::images::handlers as images;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Page
        .route("/", get(page::handle_page))
        .route("/theme", post(page::handle_set_theme))
        .route("/images/*key", get(images::handle_image))
        // Contact pipeline
        .route("/contact", post(contact::handle_contact_form))
        .route("/api/v1/contact", post(contact::handle_contact_api))
        .fallback(page::handle_not_found)
        .with_state(state)
}
