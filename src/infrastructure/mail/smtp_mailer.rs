//! SMTP Mailer
//!
//! `MailTransport` backed by lettre's async SMTP transport.

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, instrument};

use crate::config::RelayConfig;
use crate::domain::{MailError, MailTransport, OutgoingMail};

/// Port on which the relay expects implicit TLS.
pub const SMTPS_PORT: u16 = 465;

/// Sends notifications through the configured SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a mailer for the relay.
    ///
    /// Port 465 connects with implicit TLS; any other port upgrades with
    /// STARTTLS. No connection is opened until the first send.
    ///
    /// The transport pools connections on Tokio, so the mailer must be
    /// built and dropped inside a Tokio runtime.
    pub fn new(config: &RelayConfig) -> Result<Self, MailError> {
        let builder = if config.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Build(format!("invalid relay {}: {}", config.host, e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport })
    }
}

/// Assemble a multipart/alternative message from a rendered notification.
pub fn build_message(mail: OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject);

    if let Some(reply_to) = mail.reply_to.as_deref() {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
        .map_err(|e| MailError::Build(e.to_string()))
}

fn parse_mailbox(value: &str) -> Result<Mailbox, MailError> {
    value
        .parse()
        .map_err(|_| MailError::InvalidAddress(value.to_owned()))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[instrument(skip(self, mail), fields(subject = %mail.subject))]
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        debug!(code = %response.code(), "Relay accepted message");
        Ok(())
    }
}
