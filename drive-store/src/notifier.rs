use async_trait::async_trait;
use drive_domain::{Notification, Notifier, StoreError};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Broadcast-channel notifier.
///
/// Delivery is best-effort fan-out: subscribers register via `subscribe`
/// and stop listening by dropping the receiver. Sending with no listeners
/// is not an error.
pub struct ChannelNotifier {
    tx: broadcast::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a listener. Dropping the receiver cancels the subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(
        &self,
        recipient_id: &str,
        message: &str,
        related_car_id: Uuid,
    ) -> Result<(), StoreError> {
        let notification = Notification::new(
            recipient_id.to_string(),
            message.to_string(),
            related_car_id,
        );
        // A send error only means nobody is listening right now.
        if self.tx.send(notification).is_err() {
            debug!(recipient = %recipient_id, "no notification subscribers");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_notification() {
        let notifier = ChannelNotifier::new(8);
        let mut rx = notifier.subscribe();
        let car_id = Uuid::new_v4();

        notifier
            .notify("owner@example.com", "I've booked your Tesla Model 3", car_id)
            .await
            .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.recipient_id, "owner@example.com");
        assert_eq!(received.related_car_id, car_id);
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_ok() {
        let notifier = ChannelNotifier::new(8);
        notifier
            .notify("owner@example.com", "hello", Uuid::new_v4())
            .await
            .unwrap();
    }
}
