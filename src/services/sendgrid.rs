//! Email delivery.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::EmailConfig;

const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub subject: String,
    pub html: String,
}

/// Performs exactly one outbound send per message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// [`Mailer`] backed by the SendGrid v3 API.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
}

impl SendGridMailer {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build from email settings; the API key is mandatory.
    pub fn from_config(client: reqwest::Client, config: &EmailConfig) -> Result<Self> {
        let api_key = config
            .sendgrid_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("Missing mandatory settings: [SENDER_PASSWORD]"))?;
        Ok(Self::new(client, api_key))
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&MailSend::from(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(format!(
                "SendGrid answered {}: {}",
                status, body
            )));
        }

        log::info!("Email sent to {}", message.to_email);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl<'a> From<&'a EmailMessage> for MailSend<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &message.to_email,
                    name: None,
                }],
            }],
            from: Address {
                email: &message.from_email,
                name: Some(&message.from_name),
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &message.html,
            }],
        }
    }
}
