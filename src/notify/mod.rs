//! Participant notification
//!
//! Tells every participant whom they drew, one message each, and records
//! which deliveries failed. Delivery never touches the assignment.

pub mod message;
pub mod template;
pub mod transport;

pub use message::Message;
pub use transport::Transport;

use crate::config::NotifierConfig;
use crate::draw::assignment::Assignment;
use crate::draw::roster::Roster;

/// A delivery that did not go through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Participant who was not notified
    pub giver: String,
    /// Why delivery failed
    pub reason: String,
}

/// Per-participant delivery results, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Participants notified successfully
    pub delivered: Vec<String>,
    /// Participants whose notification failed
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// True when every participant was notified
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends each giver their receiver
pub struct Notifier {
    config: NotifierConfig,
    transport: Transport,
}

impl Notifier {
    /// Create a notifier using the given transport
    #[must_use]
    pub const fn new(config: NotifierConfig, transport: Transport) -> Self {
        Self { config, transport }
    }

    /// Create a notifier that prints instead of sending
    #[must_use]
    pub const fn dry_run(config: NotifierConfig) -> Self {
        Self::new(config, Transport::DryRun)
    }

    /// Create a notifier that sends through the configured mail command
    #[must_use]
    pub fn sending(config: NotifierConfig) -> Self {
        let transport = Transport::from_config(&config.mailer);
        Self::new(config, transport)
    }

    /// The transport in use
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Notify every participant. Failures are collected, not fatal.
    pub async fn notify_all(&self, roster: &Roster, assignment: &Assignment) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for giver in roster.participants() {
            let Some(receiver) = assignment.receiver_of(&giver.id) else {
                tracing::error!(giver = %giver.id, "No receiver assigned");
                report.failed.push(DeliveryFailure {
                    giver: giver.id.clone(),
                    reason: "no receiver assigned".to_string(),
                });
                continue;
            };

            let message = Message::compose(giver, receiver, &self.config);
            match self.transport.deliver(&message).await {
                Ok(()) => {
                    tracing::debug!(giver = %giver.id, "Notification delivered");
                    report.delivered.push(giver.id.clone());
                }
                Err(e) => {
                    tracing::error!(giver = %giver.id, error = %format!("{e:#}"), "Notification failed");
                    report.failed.push(DeliveryFailure {
                        giver: giver.id.clone(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        report
    }
}
