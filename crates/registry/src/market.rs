use crate::error::StoreError;
use crate::registry::BotRegistry;
use chrono::Utc;
use nexus_core::{Candle, MarketAsset};

const PLATFORM_STATE: &str = "platform_state";

impl BotRegistry {
    /// Returns the advertised asset list, empty when nothing has been
    /// published yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document is corrupt.
    pub async fn market_assets(&self) -> Result<Vec<MarketAsset>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>(
            "SELECT doc FROM market_state WHERE doc_type = ?1",
        )
        .bind(PLATFORM_STATE)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some((doc,)) => Ok(serde_json::from_str(&doc)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the advertised asset list wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn put_market_assets(
        &self,
        assets: &[MarketAsset],
        updated_by: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO market_state (doc_type, doc, last_updated_by, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(doc_type) DO UPDATE SET
                doc = excluded.doc,
                last_updated_by = excluded.last_updated_by,
                updated_at = excluded.updated_at
            ",
        )
        .bind(PLATFORM_STATE)
        .bind(serde_json::to_string(assets)?)
        .bind(updated_by)
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Returns the candle bucket for a pair and timeframe, empty when the
    /// bucket does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document is corrupt.
    pub async fn candles(&self, pair: &str, timeframe: &str) -> Result<Vec<Candle>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>(
            "SELECT doc FROM candles WHERE pair = ?1 AND timeframe = ?2",
        )
        .bind(pair)
        .bind(timeframe)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some((doc,)) => Ok(serde_json::from_str(&doc)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces one candle bucket wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn put_candles(
        &self,
        pair: &str,
        timeframe: &str,
        candles: &[Candle],
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO candles (pair, timeframe, doc, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(pair, timeframe) DO UPDATE SET
                doc = excluded.doc,
                updated_at = excluded.updated_at
            ",
        )
        .bind(pair)
        .bind(timeframe)
        .bind(serde_json::to_string(candles)?)
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: &str, close: f64) -> Candle {
        Candle {
            time: time.to_string(),
            open: close - 0.001,
            high: close + 0.002,
            low: close - 0.002,
            close,
            volume: Some(1.0),
        }
    }

    #[tokio::test]
    async fn missing_market_state_reads_empty() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        assert!(registry.market_assets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn market_assets_round_trip() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        let assets = vec![MarketAsset {
            name: "EURUSD_otc".to_string(),
            payout: 92.0,
            asset_type: "OTC".to_string(),
            active: true,
        }];
        registry.put_market_assets(&assets, "Alpha").await.unwrap();
        assert_eq!(registry.market_assets().await.unwrap(), assets);
    }

    #[tokio::test]
    async fn candle_bucket_is_unique_per_pair_and_timeframe() {
        let registry = BotRegistry::new_in_memory().await.unwrap();
        registry
            .put_candles("EURUSD", "1m", &[candle("2026-08-27T10:00:00Z", 1.08)])
            .await
            .unwrap();
        registry
            .put_candles("EURUSD", "1m", &[candle("2026-08-27T10:01:00Z", 1.09)])
            .await
            .unwrap();

        let bucket = registry.candles("EURUSD", "1m").await.unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].time, "2026-08-27T10:01:00Z");

        assert!(registry.candles("EURUSD", "5m").await.unwrap().is_empty());
    }
}
