use crate::error::StoreError;
use crate::registry::BotRegistry;
use nexus_core::Signal;

/// Cap on `GET /api/signals` responses, matching the dashboard feed depth.
pub const RECENT_SIGNALS_LIMIT: u32 = 50;

impl BotRegistry {
    /// Inserts or replaces a signal, keyed on its id.
    ///
    /// Redelivery of the same signal is a no-op overwrite, except that a
    /// settled WIN/LOSS result is never demoted back to PENDING.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn upsert_signal(&self, signal: &Signal) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        let existing = sqlx::query_as::<_, (String,)>("SELECT doc FROM signals WHERE id = ?1")
            .bind(&signal.id)
            .fetch_optional(&mut *tx)
            .await?;

        let mut record = signal.clone();
        if let Some((doc,)) = existing {
            let stored: Signal = serde_json::from_str(&doc)?;
            if stored.result.is_settled() && !record.result.is_settled() {
                record.result = stored.result;
            }
        }

        sqlx::query(
            r"
            INSERT INTO signals (id, doc, timestamp)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                doc = excluded.doc,
                timestamp = excluded.timestamp
            ",
        )
        .bind(&record.id)
        .bind(serde_json::to_string(&record)?)
        .bind(record.timestamp)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Returns up to `limit` signals, newest timestamp first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a document is corrupt.
    pub async fn recent_signals(&self, limit: u32) -> Result<Vec<Signal>, StoreError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT doc FROM signals ORDER BY timestamp DESC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|(doc,)| serde_json::from_str(doc).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::{SignalDirection, SignalResult};

    fn signal(id: &str, timestamp: i64) -> Signal {
        Signal {
            id: id.to_string(),
            bot_id: "Alpha".to_string(),
            direction: SignalDirection::Buy,
            pair: "EURUSD_otc".to_string(),
            price: 1.0825,
            timeframe: Some("1m".to_string()),
            accuracy: 91.0,
            timestamp,
            result: SignalResult::Pending,
        }
    }

    #[tokio::test]
    async fn duplicate_submission_stores_one_record() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        registry.upsert_signal(&signal("sig-1", 100)).await.unwrap();
        registry.upsert_signal(&signal("sig-1", 100)).await.unwrap();

        let stored = registry.recent_signals(RECENT_SIGNALS_LIMIT).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "sig-1");
    }

    #[tokio::test]
    async fn settled_result_survives_pending_redelivery() {
        let registry = BotRegistry::new_in_memory().await.unwrap();

        let mut won = signal("sig-1", 100);
        won.result = SignalResult::Win;
        registry.upsert_signal(&won).await.unwrap();

        // The bot redelivers the original PENDING copy.
        registry.upsert_signal(&signal("sig-1", 100)).await.unwrap();

        let stored = registry.recent_signals(RECENT_SIGNALS_LIMIT).await.unwrap();
        assert_eq!(stored[0].result, SignalResult::Win);
    }

    #[tokio::test]
    async fn pending_transitions_to_loss() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        registry.upsert_signal(&signal("sig-1", 100)).await.unwrap();

        let mut lost = signal("sig-1", 100);
        lost.result = SignalResult::Loss;
        registry.upsert_signal(&lost).await.unwrap();

        let stored = registry.recent_signals(RECENT_SIGNALS_LIMIT).await.unwrap();
        assert_eq!(stored[0].result, SignalResult::Loss);
    }

    #[tokio::test]
    async fn recent_signals_caps_and_orders_newest_first() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        for i in 0..60 {
            registry
                .upsert_signal(&signal(&format!("sig-{i}"), i))
                .await
                .unwrap();
        }

        let stored = registry.recent_signals(RECENT_SIGNALS_LIMIT).await.unwrap();
        assert_eq!(stored.len(), 50);
        assert_eq!(stored[0].id, "sig-59");
        assert!(stored.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        // No duplicates after the cap.
        let mut ids: Vec<&str> = stored.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
