mod smtp;

pub use smtp::{SmtpMailTransport, StubMailTransport, build_message};

use async_trait::async_trait;
use std::{fmt, sync::Arc};

use crate::{
    config::{Config, TransportKind},
    function::{self, FunctionRequest, FunctionResponse},
};

/// What the function hands to a transport: a fixed sender plus whatever the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
}

/// Delivery identifier assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Built message carries no Message-ID")]
    MissingMessageId,

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Stub transport error: {0}")]
    Stub(#[from] lettre::transport::stub::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Sends one message and reports the identifier it was sent under.
///
/// Implement this to put a different backend (mail catcher, real relay,
/// provider API) behind the function without touching its routing.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError>;
}

/// The relay function bound to its transport and sender address.
#[derive(Clone)]
pub struct MailRelay {
    transport: Arc<dyn MailTransport>,
    sender: String,
}

impl MailRelay {
    pub fn new(transport: Arc<dyn MailTransport>, sender: impl Into<String>) -> Self {
        Self {
            transport,
            sender: sender.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let transport: Arc<dyn MailTransport> = match config.transport {
            TransportKind::Smtp => Arc::new(SmtpMailTransport::new(&config.smtp)),
            TransportKind::Stub => Arc::new(StubMailTransport::new()),
        };
        Self::new(transport, config.sender.clone())
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub async fn handle(&self, request: FunctionRequest) -> FunctionResponse {
        function::handle(self.transport.as_ref(), &self.sender, request).await
    }
}
