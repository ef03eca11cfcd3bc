//! HTTP route handlers for reCAPTCHA Gate.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use recaptcha_common::constants::routes;

use crate::state::AppState;

mod demo;
mod error;
mod health;

pub use error::ApiError;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route(routes::HEALTH, get(health::health_check).fallback(not_found))

        // reCAPTCHA-guarded login
        .route(
            routes::DEMO_RECAPTCHA_V2,
            post(demo::demo_recaptcha_v2).fallback(not_found),
        )

        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )

        // Add shared state
        .with_state(state)
}

async fn not_found() -> (StatusCode, &'static str) {
    tracing::info!("Received a request to an unknown route");
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Last-resort boundary: a panicking handler becomes a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %details, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
