//! Transactional emails for the account lifecycle.
//!
//! Templates are pure functions returning an [`EmailMessage`]. [`EmailService`]
//! hands them to the configured [`Mailer`]; delivery is best-effort and a
//! failure is only logged.

use domain::services::{EmailMessage, Mailer};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EmailConfig;

/// Verification links stay valid this long.
pub const VERIFICATION_WINDOW_HOURS: i64 = 24;

/// Escapes text for interpolation into HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; line-height: 1.6; color: #1f2937; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: linear-gradient(135deg, #6366f1 0%, #8b5cf6 100%); padding: 28px; border-radius: 12px 12px 0 0;">
        <h1 style="color: white; margin: 0; font-size: 24px;">AItrify</h1>
    </div>
    <div style="background: #f9fafb; padding: 28px; border-radius: 0 0 12px 12px;">
        <h2 style="margin-top: 0;">{heading}</h2>
{body}
        <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 28px 0;">
        <p style="color: #9ca3af; font-size: 12px;">Need help? Contact <a href="mailto:support@aitrify.com" style="color: #6366f1;">support@aitrify.com</a></p>
    </div>
</body>
</html>"#
    )
}

fn button(url: &str, label: &str) -> String {
    format!(
        r#"        <div style="text-align: center; margin: 28px 0;">
            <a href="{url}" style="background: #6366f1; color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: bold; display: inline-block;">{label}</a>
        </div>"#
    )
}

/// Email asking a new registrant to confirm their address.
pub fn verification_email(frontend_url: &str, to: &str, name: &str, token: &str) -> EmailMessage {
    let url = escape_html(&format!("{}/verify?token={}", frontend_url, token));
    let body = format!(
        r#"        <p>Hi {name},</p>
        <p>Thanks for registering your business with AItrify. Please confirm your email address:</p>
{button}
        <p style="color: #6b7280; font-size: 14px;">This link expires in {hours} hours. If you did not register, you can ignore this email.</p>
        <p style="color: #9ca3af; font-size: 12px;">Or paste this link into your browser:<br><a href="{url}" style="color: #6366f1;">{url}</a></p>"#,
        name = escape_html(name),
        button = button(&url, "Verify email"),
        hours = VERIFICATION_WINDOW_HOURS,
        url = url,
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Verify your AItrify account email".to_string(),
        html: layout("Verify your email address", &body),
    }
}

/// Email telling an enterprise its account is active.
pub fn approval_email(frontend_url: &str, to: &str, name: &str) -> EmailMessage {
    let url = escape_html(&format!("{}/login", frontend_url));
    let body = format!(
        r#"        <p>Hi {name},</p>
        <p>Your AItrify account has been approved. You can now sign in and request AI agents for your business.</p>
{button}"#,
        name = escape_html(name),
        button = button(&url, "Sign in"),
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Your AItrify account has been activated".to_string(),
        html: layout("Your account is active", &body),
    }
}

/// Email telling an enterprise its registration was declined.
pub fn rejection_email(to: &str, name: &str, reason: Option<&str>) -> EmailMessage {
    let reason_block = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            format!(
                r#"
        <div style="background: #fef2f2; border-left: 4px solid #ef4444; padding: 12px 16px; margin: 20px 0;">
            <strong>Reason:</strong> {}
        </div>"#,
                escape_html(r)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"        <p>Hi {name},</p>
        <p>Thank you for your interest in AItrify. After review, we are unable to approve your account at this time.</p>{reason_block}
        <p>If you believe this is a mistake, please reply to this email or contact our support team.</p>"#,
        name = escape_html(name),
        reason_block = reason_block,
    );

    EmailMessage {
        to: to.to_string(),
        subject: "About your AItrify account".to_string(),
        html: layout("Account review result", &body),
    }
}

/// Email telling an enterprise one of its agent instances is live.
pub fn agent_activation_email(
    frontend_url: &str,
    to: &str,
    name: &str,
    instance_name: &str,
    agent_type_name: &str,
) -> EmailMessage {
    let url = escape_html(&format!("{}/dashboard", frontend_url));
    let body = format!(
        r#"        <p>Hi {name},</p>
        <p>Your AI agent <strong>{instance}</strong> ({agent_type}) has been activated and is ready to use.</p>
{button}"#,
        name = escape_html(name),
        instance = escape_html(instance_name),
        agent_type = escape_html(agent_type_name),
        button = button(&url, "Open dashboard"),
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Your AI agent {} is active", instance_name),
        html: layout("Your AI agent is active", &body),
    }
}

/// Renders and dispatches lifecycle emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
    enabled: bool,
    background: bool,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig, frontend_url: &str) -> Self {
        Self {
            mailer,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
            background: config.background,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn send_verification(&self, to: &str, name: &str, token: &str) {
        self.dispatch(verification_email(&self.frontend_url, to, name, token))
            .await;
    }

    pub async fn send_approval(&self, to: &str, name: &str) {
        self.dispatch(approval_email(&self.frontend_url, to, name))
            .await;
    }

    pub async fn send_rejection(&self, to: &str, name: &str, reason: Option<&str>) {
        self.dispatch(rejection_email(to, name, reason)).await;
    }

    pub async fn send_agent_activation(
        &self,
        to: &str,
        name: &str,
        instance_name: &str,
        agent_type_name: &str,
    ) {
        self.dispatch(agent_activation_email(
            &self.frontend_url,
            to,
            name,
            instance_name,
            agent_type_name,
        ))
        .await;
    }

    async fn dispatch(&self, message: EmailMessage) {
        if !self.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return;
        }

        if self.background {
            let mailer = Arc::clone(&self.mailer);
            tokio::spawn(async move {
                deliver(mailer.as_ref(), &message).await;
            });
        } else {
            deliver(self.mailer.as_ref(), &message).await;
        }
    }
}

async fn deliver(mailer: &dyn Mailer, message: &EmailMessage) {
    match mailer.send(message).await {
        Ok(()) => info!(to = %message.to, subject = %message.subject, "Email sent"),
        Err(e) => warn!(
            to = %message.to,
            subject = %message.subject,
            error = %e,
            "Email delivery failed"
        ),
    }
}
