//! Contact form client for the mail relay: serves the form page, proxies
//! `/api/*` to the relay and submits on behalf of browsers without scripts.

pub mod config;
pub mod form;
pub mod handlers;
pub mod page;
pub mod proxy;

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use form::FormClient;
use proxy::Proxy;

pub struct AppState {
    pub proxy: Proxy,
    pub client: FormClient,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit_form))
        .route("/api/{*path}", any(handlers::proxy_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
