use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::events::ActivityEvent;

#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub sequence: i64,
    pub event: ActivityEvent,
    pub stored_at: DateTime<Utc>,
}

#[async_trait]
pub trait ActivityJournal: Send + Sync {
    async fn append(&self, event: ActivityEvent) -> anyhow::Result<JournalEntry>;
    async fn stream(&self, aggregate_id: &str) -> anyhow::Result<Vec<JournalEntry>>;
    async fn entries(&self) -> anyhow::Result<Vec<JournalEntry>>;
}
