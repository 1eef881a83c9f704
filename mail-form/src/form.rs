use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const SEND_EMAIL_API_PATH: &str = "/api/send-email";

/// The three text fields the form keeps while the user types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailForm {
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Wire body of a submission. The email field goes out as `to`.
#[derive(Debug, Serialize)]
pub struct SendEmailPayload<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

/// The only two outcomes a user ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Sent,
    Failed,
}

impl Acknowledgment {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Sent => "Email sent!",
            Self::Failed => "Failed to send email.",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request rejected with status {0}")]
    Status(StatusCode),
}

/// Posts submissions to `<api_base_url>/api/send-email`.
#[derive(Clone)]
pub struct FormClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl FormClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_base_url)
    }

    pub fn with_client(client: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn send_email_url(&self) -> String {
        format!("{}{}", self.api_base_url, SEND_EMAIL_API_PATH)
    }

    pub async fn send_email(&self, payload: &SendEmailPayload<'_>) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.send_email_url())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            Err(SubmitError::Status(status))
        }
    }
}

impl MailForm {
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.subject = value.into();
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.message = value.into();
    }

    pub fn payload(&self) -> SendEmailPayload<'_> {
        SendEmailPayload {
            to: &self.email,
            subject: &self.subject,
            message: &self.message,
        }
    }

    /// Submits once. Fields are left as they are either way.
    pub async fn submit(&self, client: &FormClient) -> Acknowledgment {
        match client.send_email(&self.payload()).await {
            Ok(()) => Acknowledgment::Sent,
            Err(e) => {
                tracing::error!("Error: {e}");
                Acknowledgment::Failed
            }
        }
    }
}
