//! HTTP request handlers.

use super::page::{INVALID_FORM_NOTICE, REGISTERED_NOTICE};
use super::types::{HealthResponse, RegistrationForm};
use super::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Response,
    Form, Json,
};
use tracing::{info, warn};

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Render the empty registration form.
pub async fn show_form(State(state): State<AppState>) -> Response {
    state.page.respond(StatusCode::OK, None)
}

/// Register the submitted account and render the outcome.
///
/// Bodies the form extractor rejects still get the page, with a 400.
pub async fn submit_registration(
    State(state): State<AppState>,
    form: Result<Form<RegistrationForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Rejected registration form");
            return state
                .page
                .respond(StatusCode::BAD_REQUEST, Some(INVALID_FORM_NOTICE));
        }
    };

    match state
        .bridge
        .register_user(&form.username, &form.password)
        .await
    {
        Ok(()) => {
            info!(username = %form.username, "Registration succeeded");
            state.page.respond(StatusCode::OK, Some(REGISTERED_NOTICE))
        }
        Err(e) => {
            warn!(username = %form.username, error = %e, "Registration failed");
            state.page.respond(e.status(), Some(e.notice()))
        }
    }
}
