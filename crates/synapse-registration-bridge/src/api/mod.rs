//! HTTP surface: the registration form and a health check.

mod handlers;
mod page;
mod types;

pub use handlers::*;
pub use page::{Page, INVALID_FORM_NOTICE, REGISTERED_NOTICE};
pub use types::*;

use crate::registration::RegistrationBridge;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration pipeline
    pub bridge: Arc<RegistrationBridge>,
    /// Compiled page template
    pub page: Arc<Page>,
}

impl AppState {
    /// Create new application state.
    pub fn new(bridge: RegistrationBridge, page: Page) -> Self {
        Self {
            bridge: Arc::new(bridge),
            page: Arc::new(page),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::show_form).post(handlers::submit_registration),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
