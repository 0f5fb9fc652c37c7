//! Business logic services

pub mod clients;
pub mod equipment;
pub mod stats;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub clients: clients::ClientsService,
    pub equipment: equipment::EquipmentService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            clients: clients::ClientsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
