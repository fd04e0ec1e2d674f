use crate::error::StoreError;
use chrono::Utc;
use nexus_core::{Bot, BotRunStatus, StatusReport};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Durable, queryable store of bot records; the single source of truth for
/// fleet configuration.
///
/// Each bot is one JSON document keyed by its id, upserted whole. Writes for
/// one document run inside a transaction, so concurrent status events for
/// the same bot resolve last-write-wins without torn documents.
#[derive(Clone)]
pub struct BotRegistry {
    pool: SqlitePool,
}

impl BotRegistry {
    /// Opens the registry database and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory registry for tests and local experiments.
    ///
    /// Pinned to a single connection: every pooled connection would
    /// otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns every bot in the registry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored document is corrupt.
    pub async fn list_all(&self) -> Result<Vec<Bot>, StoreError> {
        let rows = sqlx::query_as::<_, (String,)>("SELECT doc FROM bots ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|(doc,)| serde_json::from_str(doc).map_err(StoreError::from))
            .collect()
    }

    /// Inserts the given fleet only if the registry holds zero bots.
    ///
    /// Returns the number of bots inserted (0 when the registry was already
    /// initialized). Not safe against two relays seeding concurrently; the
    /// fleet is small and fixed, so the race is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn seed_if_empty(&self, bots: &[Bot]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bots")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let now = Utc::now().timestamp();
        for bot in bots {
            sqlx::query(
                r"
                INSERT INTO bots (id, doc, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?3)
                ON CONFLICT(id) DO NOTHING
                ",
            )
            .bind(&bot.id)
            .bind(serde_json::to_string(bot)?)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!("Seeded {} initial bots", bots.len());
        Ok(bots.len())
    }

    /// Looks up one bot by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document is corrupt.
    pub async fn find(&self, id: &str) -> Result<Option<Bot>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT doc FROM bots WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(doc,)| serde_json::from_str(&doc))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Merges partial fields into an existing bot document (update-only).
    ///
    /// The `id` key is stripped from the updates: identity is immutable.
    /// Unknown keys are kept in the document, like any other document store.
    /// Returns `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpdate` if the merged document no longer parses as a
    /// bot, or a storage error if the transaction fails.
    pub async fn update_bot(
        &self,
        id: &str,
        updates: &Map<String, Value>,
    ) -> Result<Option<Bot>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, (String,)>("SELECT doc FROM bots WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((doc,)) = row else {
            return Ok(None);
        };

        let mut merged: Value = serde_json::from_str(&doc)?;
        let Some(object) = merged.as_object_mut() else {
            return Err(StoreError::InvalidUpdate {
                id: id.to_string(),
                reason: "stored document is not an object".to_string(),
            });
        };
        for (key, value) in updates {
            if key == "id" {
                continue;
            }
            object.insert(key.clone(), value.clone());
        }

        let bot: Bot =
            serde_json::from_value(merged.clone()).map_err(|err| StoreError::InvalidUpdate {
                id: id.to_string(),
                reason: err.to_string(),
            })?;

        sqlx::query("UPDATE bots SET doc = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(merged.to_string())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(bot))
    }

    /// Reconciles a status snapshot into the registry, find-or-create.
    ///
    /// Bot processes may self-register on their first report. Any status
    /// report marks the bot as linked; only an explicit logout clears it.
    /// `balance` is accepted on the wire but not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn apply_status(&self, report: &StatusReport) -> Result<Bot, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, (String,)>("SELECT doc FROM bots WHERE id = ?1")
            .bind(&report.bot_id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut bot = match row {
            Some((doc,)) => serde_json::from_str(&doc)?,
            None => Bot::new(report.bot_id.as_str()),
        };

        if let Some(running) = report.running {
            bot.status = BotRunStatus::from_running(running);
        }
        if report.selected_pair.is_some() {
            bot.assigned_asset_symbol = report.selected_pair.clone();
        }
        if report.timeframe.is_some() {
            bot.selected_timeframe = report.timeframe.clone();
        }
        if report.amount.is_some() {
            bot.trade_amount = report.amount;
        }
        if report.trading_mode.is_some() {
            bot.trading_mode = report.trading_mode;
        }
        bot.is_linked = true;

        let now = Utc::now().timestamp();
        sqlx::query(
            r"
            INSERT INTO bots (id, doc, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(id) DO UPDATE SET
                doc = excluded.doc,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&bot.id)
        .bind(serde_json::to_string(&bot)?)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(bot)
    }

    /// Marks a bot active on a resolved pair (start command, update-only).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn mark_running(&self, id: &str, pair: &str) -> Result<Option<Bot>, StoreError> {
        self.mutate(id, |bot| {
            bot.status = BotRunStatus::Active;
            bot.selected_pair = Some(pair.to_string());
        })
        .await
    }

    /// Marks a bot inactive (stop command, update-only).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn mark_stopped(&self, id: &str) -> Result<Option<Bot>, StoreError> {
        self.mutate(id, |bot| bot.status = BotRunStatus::Inactive).await
    }

    /// Records the pair a history fetch was issued for (update-only).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn set_selected_pair(&self, id: &str, pair: &str) -> Result<Option<Bot>, StoreError> {
        self.mutate(id, |bot| bot.selected_pair = Some(pair.to_string()))
            .await
    }

    async fn mutate<F>(&self, id: &str, apply: F) -> Result<Option<Bot>, StoreError>
    where
        F: FnOnce(&mut Bot),
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, (String,)>("SELECT doc FROM bots WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((doc,)) = row else {
            return Ok(None);
        };

        let mut bot: Bot = serde_json::from_str(&doc)?;
        apply(&mut bot);

        sqlx::query("UPDATE bots SET doc = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(serde_json::to_string(&bot)?)
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(bot))
    }
}
