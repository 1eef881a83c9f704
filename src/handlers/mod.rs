pub mod rest;

use axum::Router;
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::service::MailRelay;

pub fn router(relay: Arc<MailRelay>) -> Router {
    Router::new()
        .fallback(rest::invoke_function)
        .with_state(relay)
        .layer(TraceLayer::new_for_http())
}
