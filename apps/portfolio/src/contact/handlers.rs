use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Html,
    Form, Json,
};
use serde::Serialize;

use crate::contact::controller::{FormPhase, SubmitOutcome};
use crate::contact::models::ContactForm;
use crate::errors::AppError;
use crate::render::{render_page, ThemeSelection};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub status: &'static str,
    pub timestamp: String,
}

/// POST /contact
/// Re-renders the whole page with the form in its next state.
pub async fn handle_contact_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let theme = ThemeSelection::from_headers(&headers);
    let view = state.contact.submit_for_view(form).await;

    let status = match view.phase {
        FormPhase::Idle | FormPhase::Confirmed => StatusCode::OK,
        FormPhase::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        FormPhase::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let html = render_page(&state.content, theme, &view)?;
    Ok((status, Html(html)))
}

/// POST /api/v1/contact
pub async fn handle_contact_api(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<ContactReceipt>), AppError> {
    match state.contact.submit(&form).await {
        SubmitOutcome::Confirmed(stored) => Ok((
            StatusCode::CREATED,
            Json(ContactReceipt {
                status: "received",
                timestamp: stored.timestamp,
            }),
        )),
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::Failed(e) => Err(AppError::Store(e)),
    }
}
