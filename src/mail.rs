//! Outgoing account notifications.
//!
//! Delivery is best-effort: a failed e-mail is logged and never
//! fails the request that triggered it.
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

use crate::util::Sensitive;

#[derive(Debug, Error)]
#[error("could not deliver e-mail")]
pub struct DeliveryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountEmail {
    pub to: String,
    pub from: Option<String>,
    pub project_name: String,
    pub username: String,
    pub password: Sensitive<String>,
}

impl NewAccountEmail {
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{} - New account for user {}", self.project_name, self.username)
    }
}

#[async_trait]
pub trait Mailer: std::fmt::Debug + Send + Sync {
    async fn send_new_account(&self, email: NewAccountEmail) -> error_stack::Result<(), DeliveryError>;
}

/// Writes outgoing messages to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_new_account(&self, email: NewAccountEmail) -> error_stack::Result<(), DeliveryError> {
        tracing::info!(
            to = %email.to,
            from = ?email.from,
            subject = %email.subject(),
            "new account e-mail"
        );
        Ok(())
    }
}

/// Sends the e-mail on a detached task.
pub fn dispatch_new_account(mailer: Arc<dyn Mailer>, email: NewAccountEmail) {
    let span = tracing::info_span!("mail.new_account", to = %email.to);
    tokio::spawn(
        async move {
            if let Err(error) = mailer.send_new_account(email).await {
                tracing::warn!(?error, "failed to send new account e-mail");
            }
        }
        .instrument(span),
    );
}
