// src/services/email.rs

//! Email delivery service.
//!
//! [`EmailDispatcher`] sends one digest per recipient through an
//! [`EmailSender`]. Recipients are independent: a failed send is logged and
//! recorded in the [`DispatchReport`], and the remaining recipients are still
//! attempted. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::EmailConfig;
use crate::utils::http::{create_async_client, error_body};
use crate::utils::url::endpoint;

/// A single plaintext email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Transactional email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one message, returning the provider's message id.
    async fn send(&self, message: &EmailMessage) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Client for the Resend HTTP API.
#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl ResendClient {
    /// Create a client from settings.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let client = create_async_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self::with_client(client, &config.api_base, &config.api_key))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(
        client: Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        let url = endpoint(&self.api_base, &["emails"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(AppError::email(&message.to, format!("{status}: {body}")));
        }

        let sent: SendResponse = response.json().await?;
        Ok(sent.id)
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent { id: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub status: DeliveryStatus,
}

/// Per-recipient outcomes of a dispatch, in recipient order.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, DeliveryStatus::Sent { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent()
    }

    /// Recipients whose send failed.
    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, DeliveryStatus::Failed { .. }))
    }
}

/// Sends a digest to every recipient with failure isolation.
#[derive(Clone)]
pub struct EmailDispatcher {
    sender: Arc<dyn EmailSender>,
    from: String,
    subject: String,
    max_concurrent: usize,
}

impl EmailDispatcher {
    pub fn new(sender: Arc<dyn EmailSender>, config: &EmailConfig) -> Self {
        Self {
            sender,
            from: config.from.clone(),
            subject: config.subject.clone(),
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    /// Attempt delivery of `digest` to every recipient.
    pub async fn dispatch(&self, digest: &str, recipients: &[String]) -> DispatchReport {
        tracing::info!("Dispatching digest to {} recipients", recipients.len());

        let messages: Vec<EmailMessage> = recipients
            .iter()
            .map(|recipient| EmailMessage {
                from: self.from.clone(),
                to: recipient.clone(),
                subject: self.subject.clone(),
                text: digest.to_string(),
            })
            .collect();

        let sender = Arc::clone(&self.sender);
        let outcomes: Vec<DeliveryOutcome> = stream::iter(messages)
            .map(move |message| deliver(Arc::clone(&sender), message))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = DispatchReport { outcomes };
        tracing::info!(
            "Dispatch finished: {} sent, {} failed",
            report.sent(),
            report.failed()
        );
        report
    }
}

async fn deliver(sender: Arc<dyn EmailSender>, message: EmailMessage) -> DeliveryOutcome {
    let status = match sender.send(&message).await {
        Ok(id) => {
            tracing::debug!("Sent digest to {} (id {id})", message.to);
            DeliveryStatus::Sent { id }
        }
        Err(e) => {
            tracing::error!("Failed to send email to {}: {e}", message.to);
            DeliveryStatus::Failed {
                reason: e.to_string(),
            }
        }
    };

    DeliveryOutcome {
        recipient: message.to,
        status,
    }
}
