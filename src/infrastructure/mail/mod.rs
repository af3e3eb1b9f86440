//! Outbound Mail
//!
//! SMTP delivery of form notifications.

mod smtp_mailer;

pub use smtp_mailer::{build_message, SmtpMailer, SMTPS_PORT};
