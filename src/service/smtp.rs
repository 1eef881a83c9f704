use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    address::Envelope,
    message::{Mailbox, Mailboxes, header::ContentType},
    transport::stub::AsyncStubTransport,
};

use crate::config::SmtpConfig;

use super::{MailTransport, MessageId, OutgoingMail, TransportError};

/// Builds a plain-text message with a freshly generated Message-ID.
///
/// `to` may list several comma-separated recipients. Missing subject and
/// body are left out / empty. A missing recipient is only rejected by the
/// builder, same as any other malformed message.
pub fn build_message(mail: &OutgoingMail) -> Result<(Message, MessageId), TransportError> {
    let mut builder = Message::builder()
        .from(mail.from.parse::<Mailbox>()?)
        .message_id(None)
        .header(ContentType::TEXT_PLAIN);

    if let Some(to) = &mail.to {
        for mailbox in to.parse::<Mailboxes>()? {
            builder = builder.to(mailbox);
        }
    }
    if let Some(subject) = &mail.subject {
        builder = builder.subject(subject.clone());
    }

    let message = builder.body(mail.text.clone().unwrap_or_default())?;
    let message_id = message
        .headers()
        .get_raw("Message-ID")
        .map(MessageId::from)
        .ok_or(TransportError::MissingMessageId)?;

    Ok((message, message_id))
}

/// Plain SMTP delivery: no TLS, no authentication. Only fit for a local mail catcher.
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Self {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .build();

        tracing::info!(
            "SMTP transport configured for {}:{}",
            config.host,
            config.port
        );

        Self { mailer }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError> {
        let (message, message_id) = build_message(mail)?;

        tracing::debug!(
            "Sending {} to {:?} with subject {:?}",
            message_id,
            mail.to,
            mail.subject
        );

        self.mailer.send(message).await?;
        Ok(message_id)
    }
}

/// Accepts (or refuses) every message without touching the network.
pub struct StubMailTransport {
    stub: AsyncStubTransport,
}

impl StubMailTransport {
    pub fn new() -> Self {
        Self {
            stub: AsyncStubTransport::new_ok(),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            stub: AsyncStubTransport::new_error(),
        }
    }

    /// Envelopes and raw messages handed to the stub so far.
    pub async fn messages(&self) -> Vec<(Envelope, String)> {
        self.stub.messages().await
    }
}

impl Default for StubMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for StubMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError> {
        let (message, message_id) = build_message(mail)?;
        self.stub.send(message).await?;
        tracing::debug!("Stub transport accepted {}", message_id);
        Ok(message_id)
    }
}
