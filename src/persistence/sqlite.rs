// ABOUTME: SQLite-backed key-value store using sqlx
// ABOUTME: Single kv_store table; multi-key writes run inside one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use super::KeyValueStore;
use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::fs;
use tracing::debug;

/// Key-value store persisted in `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and run migrations
    ///
    /// In-memory databases use a single pooled connection so every query
    /// sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or migration fails
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match url {
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| storage_error("open in-memory database", e))?,
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::storage(format!(
                            "Failed to create database directory {}",
                            parent.display()
                        ))
                        .with_source(e)
                    })?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePool::connect_with(options)
                    .await
                    .map_err(|e| storage_error("open database", e))?
            }
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the `kv_store` table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("create kv_store table", e))?;

        debug!("kv_store migration complete");
        Ok(())
    }

    /// Last write time of a key, as stored (RFC 3339)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn updated_at(&self, key: &str) -> AppResult<Option<String>> {
        let row = sqlx::query("SELECT updated_at FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("read updated_at", e))?;

        row.map(|row| row.try_get::<String, _>("updated_at"))
            .transpose()
            .map_err(|e| storage_error("decode updated_at", e))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("read key", e))?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| storage_error("decode value", e))
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let updated_at = Utc::now().to_rfc3339();
        // Dropping the transaction without commit rolls it back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        for (key, value) in entries {
            sqlx::query(
                r"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(*key)
            .bind(value)
            .bind(&updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("write key", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("commit transaction", e))
    }
}

fn storage_error(action: &str, error: sqlx::Error) -> AppError {
    AppError::storage(format!("Failed to {action}: {error}")).with_source(error)
}
