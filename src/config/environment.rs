// ABOUTME: Environment-based application configuration for storage, patient identity, and logging
// ABOUTME: Parses DATABASE_URL, REHABIT_STORE, and REHABIT_PATIENT_ID into typed settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::errors::{AppError, AppResult};
use crate::intelligence::EngineConfig;
use crate::logging::LoggingConfig;
use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Default on-disk database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/rehabit.db";

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for non-`SQLite` URLs
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str.trim_start_matches("//")),
                })
            }
        } else if s.contains("://") {
            Err(AppError::config(format!(
                "Unsupported database URL '{s}': only sqlite is available"
            )))
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/rehabit.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Key-value store backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// `SQLite` via `DATABASE_URL`
    #[default]
    Sqlite,
    /// Process-local map; nothing survives a restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::config(format!(
                "Invalid REHABIT_STORE '{other}': expected sqlite or memory"
            ))),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database location for the `SQLite` store
    pub database_url: DatabaseUrl,
    /// Which store backs the persistence port
    pub store: StoreBackend,
    /// Patient whose plan is adapted; nil for a single local patient
    pub patient_id: Uuid,
    /// Rule configuration
    pub engine: EngineConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an invalid value or the
    /// engine configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let database_url = DatabaseUrl::parse_url(
            &env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
        )?;

        let store = env::var("REHABIT_STORE")
            .ok()
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or_default();

        let patient_id = env::var("REHABIT_PATIENT_ID")
            .ok()
            .map(|value| {
                Uuid::parse_str(&value).map_err(|e| {
                    AppError::config(format!("Invalid REHABIT_PATIENT_ID '{value}'"))
                        .with_source(e)
                })
            })
            .transpose()?
            .unwrap_or_else(Uuid::nil);

        let config = Self {
            database_url,
            store,
            patient_id,
            engine: EngineConfig::load()?,
            logging: LoggingConfig::from_env(),
        };

        info!(
            store = %config.store,
            database = %config.database_url,
            patient.id = %config.patient_id,
            "Configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/rehabit.db").unwrap(),
            DatabaseUrl::default()
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/rehabit").is_err());
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("MEMORY".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
