use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::subscription::SubscriptionRepository;
use super::notification_models::{ItemAlert, PushMessage};
use super::push_transport::PushTransport;

/// Outcome of a best-effort broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans push messages out to every registered subscription.
///
/// Each subscription is attempted independently; failures are logged and
/// counted, never returned.
#[derive(Clone)]
pub struct NotificationService {
    subscriptions: SubscriptionRepository,
    transport: Arc<dyn PushTransport>,
    notification_tx: broadcast::Sender<PushMessage>,
}

impl NotificationService {
    pub fn new(
        subscriptions: SubscriptionRepository,
        transport: Arc<dyn PushTransport>,
        notification_tx: broadcast::Sender<PushMessage>,
    ) -> Self {
        Self {
            subscriptions,
            transport,
            notification_tx,
        }
    }

    pub async fn notify_item(&self, alert: ItemAlert, item_name: &str) -> BroadcastReport {
        self.send_to_all(alert.title(), &alert.body(item_name)).await
    }

    pub async fn send_to_all(&self, title: &str, body: &str) -> BroadcastReport {
        let message = PushMessage::new(title, body);

        // SSE listeners; no receivers is fine
        let _ = self.notification_tx.send(message.clone());

        let subscriptions = self.subscriptions.find_all().await;
        let deliveries = subscriptions.iter().map(|sub| {
            let transport = Arc::clone(&self.transport);
            let message = &message;
            async move {
                match transport.deliver(sub, message).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!("Error sending notification: {}", e);
                        false
                    }
                }
            }
        });

        let results = join_all(deliveries).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        let report = BroadcastReport {
            delivered,
            failed: results.len() - delivered,
        };

        info!(
            "Sent '{}' to {} subscriptions ({} failed)",
            title, report.delivered, report.failed
        );
        report
    }
}
