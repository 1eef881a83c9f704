use serde::{Deserialize, Serialize};

pub const SENT_MESSAGE: &str = "Email sent successfully";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Body of `POST /send-email`. Every field may be missing; nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEmailResponse {
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// Any body the function can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Sent(SendEmailResponse),
    Failed(ErrorResponse),
    NotFound(NotFoundResponse),
}

impl ResponseBody {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self::Sent(SendEmailResponse {
            message: SENT_MESSAGE.to_string(),
            message_id: message_id.into(),
        })
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed(ErrorResponse {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            error: error.into(),
        })
    }

    pub fn not_found() -> Self {
        Self::NotFound(NotFoundResponse {
            message: NOT_FOUND_MESSAGE.to_string(),
        })
    }
}
