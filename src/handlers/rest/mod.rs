use axum::{
    body::Bytes,
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{function::FunctionRequest, service::MailRelay};

/// Hands every request, whatever its method or path, to the relay function.
#[debug_handler]
pub async fn invoke_function(
    State(relay): State<Arc<MailRelay>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = (!body.is_empty()).then_some(body);
    let request = FunctionRequest::new(method, uri.path(), body);

    relay.handle(request).await.into_response()
}
