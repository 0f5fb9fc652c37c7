//! Storage backends
//!
//! The server talks to its data through three store traits. Each has a
//! durable PostgreSQL implementation and a volatile in-process one. Which
//! of the two serves the process is decided exactly once, at startup, by
//! [`Storage::select`]; the backends are never mixed within one process.

pub mod memory;
pub mod postgres;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Client, Equipment, EquipmentCounter, EquipmentFilter, EquipmentType},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Per-type sequence used to mint equipment names
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create a zero counter for every known type that has none. Never resets.
    async fn seed(&self) -> AppResult<()>;

    /// Current value; `NotFound` if the type was never seeded
    async fn get(&self, kind: EquipmentType) -> AppResult<i64>;

    /// Atomically add one and return the new value.
    /// Fails with `CounterNotInitialized` if the type was never seeded.
    async fn increment_and_get(&self, kind: EquipmentType) -> AppResult<i64>;

    async fn list(&self) -> AppResult<Vec<EquipmentCounter>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Client>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Client>>;

    async fn insert(&self, client: &Client) -> AppResult<Client>;

    /// Replace the stored row; `None` if it does not exist
    async fn update(&self, client: &Client) -> AppResult<Option<Client>>;

    /// `ReferenceInUse` while equipment still points at the client
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// Matching records ordered by name
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Equipment>>;

    /// Insert a new record. The client must exist and the name must be unused.
    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment>;

    /// Replace the stored row; `None` if it does not exist
    async fn update(&self, equipment: &Equipment) -> AppResult<Option<Equipment>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of existing records per type
    async fn count_by_type(&self) -> AppResult<Vec<(EquipmentType, i64)>>;
}

/// Which backend serves this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Durable,
    Volatile,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Durable => write!(f, "durable"),
            StorageMode::Volatile => write!(f, "volatile"),
        }
    }
}

/// The stores of the selected backend
#[derive(Clone)]
pub struct Storage {
    mode: StorageMode,
    pool: Option<PgPool>,
    pub counters: Arc<dyn CounterStore>,
    pub clients: Arc<dyn ClientStore>,
    pub equipment: Arc<dyn EquipmentStore>,
}

impl Storage {
    /// In-process maps; lost on restart
    pub fn volatile() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            mode: StorageMode::Volatile,
            pool: None,
            counters: store.clone(),
            clients: store.clone(),
            equipment: store,
        }
    }

    /// PostgreSQL through the given pool
    pub fn durable(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        Self {
            mode: StorageMode::Durable,
            pool: Some(pool),
            counters: store.clone(),
            clients: store.clone(),
            equipment: store,
        }
    }

    /// Probe the configured database once and pick the backend for the whole process.
    ///
    /// No URL or a failed probe yields volatile storage. A reachable database
    /// is migrated; a migration failure is returned as an error.
    pub async fn select(config: &DatabaseConfig) -> AppResult<Self> {
        let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            tracing::info!("No database configured, using in-memory storage");
            return Ok(Self::volatile());
        };

        let pool = match connect_and_probe(url, config).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "Database connection failed, using in-memory storage");
                return Ok(Self::volatile());
            }
        };
        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Database migrations failed: {}", e)))?;
        tracing::info!("Database migrations completed");

        Ok(Self::durable(pool))
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Lightweight liveness query against the durable backend
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

async fn connect_and_probe(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(url)
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}
