//! Equipment tracker server
//!
//! REST JSON API for tracking the computers and UPS units owned by the
//! clients of a service company. Every equipment record receives a
//! sequential, never reused display name (`P0001`, `N0001`, ...).

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use store::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Storage,
    pub services: Arc<Services>,
}

impl AppState {
    /// Seed the name counters of the selected backend and wire the services
    pub async fn initialize(config: AppConfig, storage: Storage) -> AppResult<Self> {
        storage.counters.seed().await?;
        tracing::info!(mode = %storage.mode(), "Equipment counters seeded");

        let services = Services::new(Repository::new(&storage));
        Ok(Self {
            config: Arc::new(config),
            storage,
            services: Arc::new(services),
        })
    }
}
