use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::images::PlaceholderSpec;
use crate::state::AppState;

/// GET /images/*key
/// Unparseable placeholder parameters fall back to the defaults.
pub async fn handle_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
    spec: Option<Query<PlaceholderSpec>>,
) -> Response {
    let spec = spec.map(|Query(spec)| spec).unwrap_or_default();
    let image = state.images.resolve(&key, &spec).await;

    // Placeholders are short-lived so a newly added asset shows up soon.
    let cache = if image.placeholder {
        "public, max-age=300"
    } else {
        "public, max-age=3600"
    };

    (
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, cache),
        ],
        image.bytes,
    )
        .into_response()
}
