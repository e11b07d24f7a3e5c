//! Order confirmation emails over SMTP.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{Notifier, NotifyError};
use crate::config::EmailConfig;

pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Check if email sending is configured and enabled
    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    async fn deliver(
        &self,
        to: Mailbox,
        subject: &str,
        html_body: String,
        text_body: String,
    ) -> Result<(), NotifyError> {
        let smtp_host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or_else(|| NotifyError::Send("SMTP host not configured".to_string()))?;
        let from_address = self
            .config
            .from_address
            .as_ref()
            .ok_or_else(|| NotifyError::Send("From address not configured".to_string()))?;

        let from: Mailbox = format!("{} <{}>", self.config.from_name, from_address)
            .parse()
            .map_err(|e| NotifyError::Send(format!("invalid from address: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        let mailer = if self.config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
                .map_err(|e| NotifyError::Send(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer
            .build()
            .send(email)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        tracing::info!(subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(
        &self,
        recipient_name: &str,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        if !self.is_enabled() {
            tracing::warn!(
                "Email not configured, skipping notification to {}",
                recipient_email
            );
            return Ok(());
        }

        let to: Mailbox = format!("{recipient_name} <{recipient_email}>")
            .parse()
            .map_err(|_| NotifyError::InvalidRecipient(recipient_email.to_string()))?;

        let html_body = render_order_html(subject, body);
        let text_body = render_order_text(body);
        self.deliver(to, subject, html_body, text_body).await
    }
}

/// Render the HTML version of an order notification
fn render_order_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            margin: 0;
            padding: 0;
            background-color: #f5f5f5;
        }}
        .container {{
            max-width: 560px;
            margin: 0 auto;
            padding: 40px 20px;
        }}
        .card {{
            background-color: #ffffff;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.06);
            overflow: hidden;
        }}
        .header {{
            background: linear-gradient(135deg, #ef4444 0%, #b91c1c 100%);
            color: white;
            padding: 32px 24px;
            text-align: center;
        }}
        .header h1 {{
            margin: 0;
            font-size: 24px;
            font-weight: 600;
        }}
        .content {{
            padding: 32px 24px;
        }}
        .content p {{
            margin: 0 0 16px;
            color: #374151;
            line-height: 1.6;
        }}
        .footer {{
            padding: 24px;
            text-align: center;
            color: #9ca3af;
            font-size: 12px;
            border-top: 1px solid #f3f4f6;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <div class="header">
                <h1>{title}</h1>
            </div>
            <div class="content">
                <p>{body}</p>
            </div>
            <div class="footer">
                <p>Sent by Sliceline - Hot pizza, delivered</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
        title = html_escape(title),
        body = html_escape(body),
    )
}

/// Render the plain text version of an order notification
fn render_order_text(body: &str) -> String {
    format!(
        r#"{body}

---
Sent by Sliceline - Hot pizza, delivered"#
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_render_order_text() {
        let text = render_order_text("Your order is ready.");
        assert!(text.contains("Your order is ready."));
        assert!(text.contains("Sliceline"));
    }

    #[test]
    fn test_render_order_html() {
        let html = render_order_html("Order ab12cd34ef ready", "Your order is ready.");
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Order ab12cd34ef ready"));
        assert!(html.contains("Your order is ready."));
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_skips_sending() {
        let notifier = EmailNotifier::new(EmailConfig::default());
        assert!(!notifier.is_enabled());
        notifier
            .send("Alice Miller", "alice@x.com", "Order ready", "Body")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bad_recipient_is_rejected() {
        let config = EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            from_address: Some("orders@sliceline.io".to_string()),
            ..EmailConfig::default()
        };
        let notifier = EmailNotifier::new(config);

        let err = notifier
            .send("Alice", "not an address", "Subject", "Body")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidRecipient(_)));
    }
}
