use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityKind {
    DeliveryOpened,
    RiderAssigned,
    DeliveryAccepted,
    DeliveryStatusAdvanced,
    OrderStatusSet,
    RiderRegistered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub aggregate_id: String,
    pub kind: ActivityKind,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl ActivityEvent {
    pub fn new(kind: ActivityKind, aggregate_id: &str, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            aggregate_id: aggregate_id.to_string(),
            kind,
            occurred_at: Utc::now(),
            payload,
        }
    }
}
