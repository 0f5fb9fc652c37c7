//! In-process storage used when no database is reachable

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClientStore, CounterStore, EquipmentStore};
use crate::{
    error::{AppError, AppResult},
    models::{Client, Equipment, EquipmentCounter, EquipmentFilter, EquipmentType},
};

/// Volatile store keyed by identifier.
///
/// Lock order is clients, then equipment. Counters are guarded by their own
/// mutex, which makes read-increment-write a single critical section.
#[derive(Default)]
pub struct MemoryStore {
    clients: RwLock<HashMap<Uuid, Client>>,
    equipment: RwLock<HashMap<Uuid, Equipment>>,
    counters: Mutex<HashMap<EquipmentType, i64>>,
}

fn poisoned(name: &str) -> AppError {
    AppError::Internal(format!("{} lock poisoned", name))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn clients_read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<Uuid, Client>>> {
        self.clients.read().map_err(|_| poisoned("clients"))
    }

    fn clients_write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<Uuid, Client>>> {
        self.clients.write().map_err(|_| poisoned("clients"))
    }

    fn equipment_read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<Uuid, Equipment>>> {
        self.equipment.read().map_err(|_| poisoned("equipment"))
    }

    fn equipment_write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<Uuid, Equipment>>> {
        self.equipment.write().map_err(|_| poisoned("equipment"))
    }

    fn counters(&self) -> AppResult<MutexGuard<'_, HashMap<EquipmentType, i64>>> {
        self.counters.lock().map_err(|_| poisoned("counters"))
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn seed(&self) -> AppResult<()> {
        let mut counters = self.counters()?;
        for kind in EquipmentType::ALL {
            counters.entry(kind).or_insert(0);
        }
        Ok(())
    }

    async fn get(&self, kind: EquipmentType) -> AppResult<i64> {
        self.counters()?
            .get(&kind)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("No counter for equipment type {}", kind)))
    }

    async fn increment_and_get(&self, kind: EquipmentType) -> AppResult<i64> {
        let mut counters = self.counters()?;
        let counter = counters
            .get_mut(&kind)
            .ok_or(AppError::CounterNotInitialized(kind))?;
        *counter += 1;
        Ok(*counter)
    }

    async fn list(&self) -> AppResult<Vec<EquipmentCounter>> {
        let mut rows: Vec<EquipmentCounter> = self
            .counters()?
            .iter()
            .map(|(&equipment_type, &counter)| EquipmentCounter {
                equipment_type,
                counter,
            })
            .collect();
        rows.sort_by_key(|c| c.equipment_type);
        Ok(rows)
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Client>> {
        let mut rows: Vec<Client> = self.clients_read()?.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Client>> {
        Ok(self.clients_read()?.get(&id).cloned())
    }

    async fn insert(&self, client: &Client) -> AppResult<Client> {
        let mut clients = self.clients_write()?;
        if clients.contains_key(&client.id) {
            return Err(AppError::Conflict(format!("Client {} already exists", client.id)));
        }
        clients.insert(client.id, client.clone());
        Ok(client.clone())
    }

    async fn update(&self, client: &Client) -> AppResult<Option<Client>> {
        let mut clients = self.clients_write()?;
        Ok(clients.get_mut(&client.id).map(|existing| {
            *existing = client.clone();
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut clients = self.clients_write()?;
        if !clients.contains_key(&id) {
            return Ok(false);
        }
        let owned = self
            .equipment_read()?
            .values()
            .filter(|e| e.client_id == id)
            .count();
        if owned > 0 {
            return Err(AppError::ReferenceInUse(format!(
                "Client {} still owns {} equipment record(s)",
                id, owned
            )));
        }
        clients.remove(&id);
        Ok(true)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.clients_read()?.len() as i64)
    }
}

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let mut rows: Vec<Equipment> = self
            .equipment_read()?
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Equipment>> {
        Ok(self.equipment_read()?.get(&id).cloned())
    }

    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment> {
        let clients = self.clients_read()?;
        if !clients.contains_key(&equipment.client_id) {
            return Err(AppError::field("clientId", "Client not found"));
        }
        let mut rows = self.equipment_write()?;
        if rows.contains_key(&equipment.id) || rows.values().any(|e| e.name == equipment.name) {
            return Err(AppError::Conflict(format!(
                "Equipment name {} is already taken",
                equipment.name
            )));
        }
        rows.insert(equipment.id, equipment.clone());
        Ok(equipment.clone())
    }

    async fn update(&self, equipment: &Equipment) -> AppResult<Option<Equipment>> {
        let clients = self.clients_read()?;
        let mut rows = self.equipment_write()?;
        let Some(existing) = rows.get_mut(&equipment.id) else {
            return Ok(None);
        };
        if !clients.contains_key(&equipment.client_id) {
            return Err(AppError::field("clientId", "Client not found"));
        }
        *existing = equipment.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.equipment_write()?.remove(&id).is_some())
    }

    async fn count_by_type(&self) -> AppResult<Vec<(EquipmentType, i64)>> {
        let rows = self.equipment_read()?;
        Ok(EquipmentType::ALL
            .into_iter()
            .map(|kind| {
                let count = rows.values().filter(|e| e.equipment_type == kind).count();
                (kind, count as i64)
            })
            .collect())
    }
}
