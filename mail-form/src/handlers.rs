use crate::{
    AppState,
    form::MailForm,
    page,
};
use axum::{
    Form,
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use axum_macros::debug_handler;
use std::sync::Arc;

#[debug_handler]
pub async fn index() -> Html<&'static str> {
    page::index()
}

#[debug_handler]
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MailForm>,
) -> Html<String> {
    tracing::info!("Submitting form for {}", form.email);
    let ack = form.submit(&state.client).await;
    page::acknowledgment(ack)
}

#[debug_handler]
pub async fn proxy_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    tracing::info!("Forwarding request to mail relay");
    match state.proxy.forward_request(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Proxy failure: {e}");
            (e.status(), "Service unavailable").into_response()
        }
    }
}
