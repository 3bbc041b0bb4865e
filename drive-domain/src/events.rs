use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A best-effort message to a user, delivered outside the booking commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient_id: String,
    pub message: String,
    pub related_car_id: Uuid,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: String, message: String, related_car_id: Uuid) -> Self {
        Self {
            recipient_id,
            message,
            related_car_id,
            sent_at: Utc::now(),
        }
    }
}
