use async_trait::async_trait;
use chrono::Utc;
use shawarma_core::{ActivityEvent, ActivityJournal, JournalEntry};
use tokio::sync::RwLock;

/// Process-lifetime activity journal. Entries are never removed.
#[derive(Default)]
pub struct InMemoryJournal {
    entries: RwLock<Vec<JournalEntry>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityJournal for InMemoryJournal {
    async fn append(&self, event: ActivityEvent) -> anyhow::Result<JournalEntry> {
        let mut entries = self.entries.write().await;

        let entry = JournalEntry {
            sequence: entries.len() as i64 + 1,
            event,
            stored_at: Utc::now(),
        };
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn stream(&self, aggregate_id: &str) -> anyhow::Result<Vec<JournalEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| entry.event.aggregate_id == aggregate_id)
            .cloned()
            .collect())
    }

    async fn entries(&self) -> anyhow::Result<Vec<JournalEntry>> {
        Ok(self.entries.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shawarma_core::ActivityKind;

    use super::*;

    #[tokio::test]
    async fn sequences_are_contiguous_across_aggregates() {
        let journal = InMemoryJournal::new();
        journal
            .append(ActivityEvent::new(ActivityKind::RiderAssigned, "d1", json!({})))
            .await
            .unwrap();
        let second = journal
            .append(ActivityEvent::new(ActivityKind::OrderStatusSet, "o2", json!({})))
            .await
            .unwrap();

        assert_eq!(second.sequence, 2);
        assert_eq!(journal.entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stream_filters_by_aggregate() {
        let journal = InMemoryJournal::new();
        for aggregate in ["d2", "o3", "d2"] {
            journal
                .append(ActivityEvent::new(
                    ActivityKind::DeliveryStatusAdvanced,
                    aggregate,
                    json!({ "aggregate": aggregate }),
                ))
                .await
                .unwrap();
        }

        let stream = journal.stream("d2").await.unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(
            stream.iter().map(|entry| entry.sequence).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(journal.stream("missing").await.unwrap().is_empty());
    }
}
