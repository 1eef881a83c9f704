//! The relay function itself: one call per HTTP request, mapping
//! (method, path, body) to (status, headers, body).
//!
//! Only `POST /send-email` does anything. The body is passed through to the
//! mail transport unvalidated, and every parse or send failure becomes a 500
//! carrying the raw error text.

use axum::{
    Json,
    body::Bytes,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de;
use serde_json::Value;

use crate::{
    dto::{ResponseBody, SendEmailRequest},
    service::{MailTransport, MessageId, OutgoingMail, TransportError},
};

pub const SEND_EMAIL_PATH: &str = "/send-email";

#[derive(Debug, Clone)]
pub struct FunctionRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Bytes>,
}

impl FunctionRequest {
    pub fn new(method: Method, path: impl Into<String>, body: Option<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    fn is_send_email(&self) -> bool {
        self.method == Method::POST && self.path == SEND_EMAIL_PATH
    }
}

#[derive(Debug, Clone)]
pub struct FunctionResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.body)).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub async fn handle(
    transport: &dyn MailTransport,
    sender: &str,
    request: FunctionRequest,
) -> FunctionResponse {
    tracing::info!("Received event: {:?}", request);

    if !request.is_send_email() {
        return not_found();
    }

    match relay(transport, sender, request.body.as_deref()).await {
        Ok(message_id) => {
            tracing::info!("Message sent: {}", message_id);
            sent(message_id)
        }
        Err(e) => {
            tracing::error!("Error: {e}");
            internal_error(&e)
        }
    }
}

async fn relay(
    transport: &dyn MailTransport,
    sender: &str,
    body: Option<&[u8]>,
) -> Result<MessageId, FunctionError> {
    let request = parse_body(body)?;

    let mail = OutgoingMail {
        from: sender.to_string(),
        to: request.to,
        subject: request.subject,
        text: request.message,
    };

    Ok(transport.send(&mail).await?)
}

/// An absent or empty body counts as `{}`. Anything else must be a JSON object.
pub fn parse_body(body: Option<&[u8]>) -> Result<SendEmailRequest, serde_json::Error> {
    let bytes = match body {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Ok(SendEmailRequest::default()),
    };

    // Derived struct impls also accept arrays, filling fields by position
    match serde_json::from_slice::<Value>(bytes)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        other => Err(de::Error::custom(format!(
            "request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

fn sent(message_id: MessageId) -> FunctionResponse {
    let mut headers = base_headers();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    FunctionResponse {
        status: StatusCode::OK,
        headers,
        body: ResponseBody::sent(message_id.into_inner()),
    }
}

fn not_found() -> FunctionResponse {
    FunctionResponse {
        status: StatusCode::NOT_FOUND,
        headers: base_headers(),
        body: ResponseBody::not_found(),
    }
}

// The raw error text goes back to the caller unfiltered.
fn internal_error(error: &FunctionError) -> FunctionResponse {
    FunctionResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        headers: base_headers(),
        body: ResponseBody::failed(error.to_string()),
    }
}
