//! Repository layer over the selected storage backend

pub mod clients;
pub mod equipment;

use std::sync::Arc;

use crate::store::{CounterStore, Storage};

/// Main repository struct holding the stores of the selected backend
#[derive(Clone)]
pub struct Repository {
    pub counters: Arc<dyn CounterStore>,
    pub clients: clients::ClientsRepository,
    pub equipment: equipment::EquipmentRepository,
}

impl Repository {
    /// Create a new repository over the given storage
    pub fn new(storage: &Storage) -> Self {
        Self {
            counters: storage.counters.clone(),
            clients: clients::ClientsRepository::new(storage.clients.clone()),
            equipment: equipment::EquipmentRepository::new(
                storage.counters.clone(),
                storage.clients.clone(),
                storage.equipment.clone(),
            ),
        }
    }
}
