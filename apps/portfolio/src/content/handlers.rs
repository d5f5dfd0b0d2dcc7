use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use crate::contact::controller::ContactFormView;
use crate::errors::AppError;
use crate::render::{render_page, ThemeSelection};
use crate::state::AppState;

/// GET /
pub async fn handle_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let theme = ThemeSelection::from_headers(&headers);
    let html = render_page(&state.content, theme, &ContactFormView::idle())?;
    Ok(Html(html))
}

#[derive(Deserialize)]
pub struct ThemeForm {
    #[serde(default)]
    pub theme: String,
}

/// POST /theme
/// Stores the choice in a cookie and sends the visitor back to the page.
pub async fn handle_set_theme(Form(form): Form<ThemeForm>) -> Response {
    let theme = form.theme.parse::<ThemeSelection>().unwrap_or_else(|e| {
        debug!("{e}; using default theme");
        ThemeSelection::default()
    });

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, theme.set_cookie()),
        ],
    )
        .into_response()
}

/// Fallback for unknown paths.
pub async fn handle_not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}
