//! PostgreSQL-backed document store. Each collection is a two-column table:
//! a store-assigned UUID and a JSONB document.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::store::{
    document, Collection, DeleteResult, DocumentStore, FieldFilter, InsertResult, StoreError,
    UpdateResult,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect with the configured pool size and timeouts, then make sure the
    /// collection tables exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.connection_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.bootstrap().await?;

        info!("Connected document store ({})", config.name);
        Ok(store)
    }

    async fn bootstrap(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                 id UUID PRIMARY KEY DEFAULT gen_random_uuid(), \
                 doc JSONB NOT NULL)",
                collection.table()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: Collection, doc: Value) -> Result<InsertResult, StoreError> {
        let sql = format!(
            "INSERT INTO {} (doc) VALUES ($1) RETURNING id",
            collection.table()
        );
        let row = sqlx::query(&sql).bind(doc).fetch_one(&self.pool).await?;
        let inserted_id: Uuid = row.try_get("id")?;
        Ok(InsertResult { inserted_id })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = match filter {
            Some(filter) => {
                // json_key comes from a closed enum, not client input
                let sql = format!(
                    "SELECT id, doc FROM {} WHERE doc->>'{}' = $1",
                    collection.table(),
                    filter.field.json_key()
                );
                sqlx::query(&sql)
                    .bind(filter.value)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT id, doc FROM {}", collection.table());
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let doc: Value = row.try_get("doc")?;
                Ok(document(id, doc))
            })
            .collect()
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let doc: Value = row.try_get("doc")?;
                Ok(Some(document(id, doc)))
            }
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        patch: Value,
    ) -> Result<UpdateResult, StoreError> {
        // Merge-patch upsert: insert the patch as a fresh document on miss,
        // otherwise fold it into the existing one. xmax = 0 distinguishes a
        // freshly inserted row from an updated one.
        let sql = format!(
            "INSERT INTO {table} (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = {table}.doc || EXCLUDED.doc \
             RETURNING (xmax = 0) AS inserted",
            table = collection.table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(patch)
            .fetch_one(&self.pool)
            .await?;
        let inserted: bool = row.try_get("inserted")?;

        if inserted {
            Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
            })
        } else {
            Ok(UpdateResult {
                matched_count: 1,
                modified_count: 1,
                upserted_id: None,
            })
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed document store pool");
    }
}
