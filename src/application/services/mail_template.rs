//! Notification templates for form submissions.
//!
//! Each kind renders a subject, a plaintext body and an HTML body. Every
//! visitor-supplied value is escaped before it is placed in HTML.

use chrono::{DateTime, FixedOffset};

use crate::domain::{Submission, SubmissionKind};

/// Subject and bodies for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Render the notification for a validated submission.
pub fn render(
    kind: SubmissionKind,
    submission: &Submission,
    received_at: DateTime<FixedOffset>,
) -> RenderedMail {
    let received = received_at.format("%d/%m/%Y, %-I:%M:%S %P").to_string();
    match kind {
        SubmissionKind::Contact => render_contact(submission, &received),
        SubmissionKind::Quote => render_quote(submission, &received),
    }
}

fn render_contact(s: &Submission, received: &str) -> RenderedMail {
    let email = s.email.as_deref().unwrap_or("");
    let subject = format!("New contact request: {} — {}", s.service, s.name);

    let text = format!(
        "Name: {}\nEmail: {}\nPhone: {}\nService: {}\nMessage:\n{}",
        s.name, email, s.phone, s.service, s.message
    );

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #1e40af; border-bottom: 2px solid #1e40af; padding-bottom: 10px;">New Contact Request - RN Steel Works</h2>
  <div style="background: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <table style="width: 100%; border-collapse: collapse;">
      <tr><td style="padding: 8px; font-weight: bold; color: #374151; width: 100px;">Name:</td><td style="padding: 8px;">{name}</td></tr>
      <tr><td style="padding: 8px; font-weight: bold; color: #374151;">Email:</td><td style="padding: 8px;">{email}</td></tr>
      <tr><td style="padding: 8px; font-weight: bold; color: #374151;">Phone:</td><td style="padding: 8px;">{phone}</td></tr>
      <tr><td style="padding: 8px; font-weight: bold; color: #374151;">Service:</td><td style="padding: 8px;">{service}</td></tr>
    </table>
  </div>
  <div style="background: #eff6ff; padding: 15px; border-radius: 8px; border-left: 4px solid #1e40af;">
    <h3 style="margin: 0 0 10px 0; color: #1e40af;">Message:</h3>
    <p style="margin: 0; white-space: pre-line;">{message}</p>
  </div>
  <div style="margin-top: 20px; padding-top: 15px; border-top: 1px solid #e5e7eb; color: #6b7280; font-size: 12px;">Sent from RN Steel Works Contact Form • {received}</div>
</div>"#,
        name = escape_html(&s.name),
        email = s.email.as_deref().map_or_else(|| "Not provided".into(), escape_html),
        phone = escape_html(&s.phone),
        service = escape_html(&s.service),
        message = escape_html(&s.message),
        received = received,
    );

    RenderedMail {
        subject,
        text,
        html,
    }
}

fn render_quote(s: &Submission, received: &str) -> RenderedMail {
    let subject = format!("Quote Request: {} — {}", s.service, s.name);

    let text = [
        format!("Service: {}", s.service),
        format!("Name: {}", s.name),
        format!("Email: {}", s.email.as_deref().unwrap_or("—")),
        format!("Phone: {}", s.phone),
        String::new(),
        "Message:".to_owned(),
        s.message.clone(),
        String::new(),
        format!("Received: {received}"),
    ]
    .join("\n");

    let html = format!(
        r#"<div style="font-family: system-ui, -apple-system, Segoe UI, Roboto, 'Helvetica Neue', Arial; color:#0f172a; line-height:1.4;">
  <div style="max-width:700px;margin:0 auto;border-radius:12px;overflow:hidden;border:1px solid #e6eef8">
    <div style="background:linear-gradient(90deg,#0369a1,#0ea5a9);padding:20px;color:white;">
      <h2 style="margin:0;font-size:18px;font-weight:700;">New Quote Request — {service}</h2>
      <p style="margin:6px 0 0 0;font-size:13px;opacity:0.95">From: {name} — received {received}</p>
    </div>
    <div style="padding:18px;background:#fff;">
      <table style="width:100%;border-collapse:collapse;margin-bottom:12px;">
        <tr><td style="padding:8px 0;font-weight:600;width:110px;color:#334155">Name</td><td style="padding:8px 0;color:#0f172a">{name}</td></tr>
        <tr><td style="padding:8px 0;font-weight:600;color:#334155">Phone</td><td style="padding:8px 0;color:#0f172a">{phone}</td></tr>
        <tr><td style="padding:8px 0;font-weight:600;color:#334155">Email</td><td style="padding:8px 0;color:#0f172a">{email}</td></tr>
        <tr><td style="padding:8px 0;font-weight:600;color:#334155">Service</td><td style="padding:8px 0;color:#0f172a">{service}</td></tr>
      </table>
      <div style="padding:12px;background:#f8fafc;border-radius:8px;border:1px solid #eef2ff;color:#0f172a;">
        <strong style="display:block;margin-bottom:6px;color:#0f172a">Message</strong>
        <div style="white-space:pre-wrap;font-size:14px;color:#0f172a">{message}</div>
      </div>
      <div style="margin-top:14px;font-size:12px;color:#64748b"><p style="margin:0">This message was sent from the website contact form.</p></div>
    </div>
    <div style="background:#f1f5f9;padding:12px;text-align:center;font-size:12px;color:#94a3b8">RN All Steel Fabrication — Mumbai &amp; Thane</div>
  </div>
</div>"#,
        name = escape_html(&s.name),
        email = s.email.as_deref().map_or_else(|| "—".into(), escape_html),
        phone = escape_html(&s.phone),
        service = escape_html(&s.service),
        message = escape_html(&s.message),
        received = received,
    );

    RenderedMail {
        subject,
        text,
        html,
    }
}

/// Escape the characters that matter inside HTML text and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
