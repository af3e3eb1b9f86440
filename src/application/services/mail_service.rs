//! Mail Dispatcher
//!
//! Validates contact and quote submissions and relays them as a single
//! notification mail. One attempt per submission; callers may resubmit.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use tracing::{error, info, instrument, warn};

use super::mail_template::render;
use crate::config::RelayConfig;
use crate::domain::{
    validate_submission, MailTransport, OutgoingMail, RawSubmission, SubmissionError,
    SubmissionKind,
};

/// A configured relay together with the envelope it sends under.
#[derive(Clone)]
pub struct MailRelay {
    transport: Arc<dyn MailTransport>,
    sender: String,
    recipient: String,
}

impl MailRelay {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    /// Build the envelope from resolved relay settings.
    pub fn from_config(transport: Arc<dyn MailTransport>, config: &RelayConfig) -> Self {
        Self::new(transport, config.sender.clone(), config.recipient.clone())
    }
}

/// Turns form submissions into notification mails.
pub struct MailDispatcher {
    relay: Option<MailRelay>,
    utc_offset: FixedOffset,
}

impl MailDispatcher {
    /// `relay` is `None` when SMTP settings are incomplete; submissions
    /// then fail with [`SubmissionError::ServerMisconfigured`].
    pub fn new(relay: Option<MailRelay>, utc_offset_minutes: i32) -> Self {
        let utc_offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| {
            warn!(utc_offset_minutes, "Invalid UTC offset, using UTC");
            Utc.fix()
        });
        Self { relay, utc_offset }
    }

    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }

    /// Validate and relay one submission.
    ///
    /// Returns the acknowledgement to show the visitor.
    #[instrument(skip(self, raw), fields(kind = %kind))]
    pub async fn dispatch(
        &self,
        kind: SubmissionKind,
        raw: RawSubmission,
    ) -> Result<&'static str, SubmissionError> {
        let submission = validate_submission(raw).inspect_err(|e| {
            info!(reason = %e, "Submission rejected");
        })?;

        let Some(relay) = &self.relay else {
            error!("Missing SMTP configuration, cannot relay submission");
            return Err(SubmissionError::ServerMisconfigured);
        };

        let received_at = Utc::now().with_timezone(&self.utc_offset);
        let rendered = render(kind, &submission, received_at);

        let mail = OutgoingMail {
            from: relay.sender.clone(),
            to: relay.recipient.clone(),
            reply_to: submission.email.clone(),
            subject: rendered.subject,
            text: rendered.text,
            html: rendered.html,
        };

        relay.transport.send(mail).await.map_err(|e| {
            error!(error = %e, "Failed to relay submission");
            SubmissionError::DispatchFailed(e.to_string())
        })?;

        info!("Submission relayed");
        Ok(kind.acknowledgement())
    }
}
