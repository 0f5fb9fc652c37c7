//! Equipment repository
//!
//! Creation is the only place names are minted: the type's counter is
//! advanced first, then the record is written under the resulting name.
//! A failed write leaves a gap in the sequence, never a duplicate.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Equipment, EquipmentFilter, EquipmentPatch, EquipmentType, NewEquipment},
    naming,
    store::{ClientStore, CounterStore, EquipmentStore},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    counters: Arc<dyn CounterStore>,
    clients: Arc<dyn ClientStore>,
    store: Arc<dyn EquipmentStore>,
}

impl EquipmentRepository {
    pub fn new(
        counters: Arc<dyn CounterStore>,
        clients: Arc<dyn ClientStore>,
        store: Arc<dyn EquipmentStore>,
    ) -> Self {
        Self {
            counters,
            clients,
            store,
        }
    }

    async fn ensure_client(&self, client_id: Uuid) -> AppResult<()> {
        match self.clients.get(client_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::field("clientId", "Client not found")),
        }
    }

    /// Create equipment under a freshly minted name
    pub async fn create(&self, data: NewEquipment) -> AppResult<Equipment> {
        self.ensure_client(data.client_id).await?;

        let kind = data.equipment_type;
        let value = self.counters.increment_and_get(kind).await?;
        let equipment = Equipment::from_new(naming::format_name(kind, value), data);

        match self.store.insert(&equipment).await {
            Ok(created) => {
                tracing::debug!(name = %created.name, id = %created.id, "Equipment created");
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(
                    name = %equipment.name,
                    equipment_type = %kind,
                    "Equipment insert failed, counter value {} is skipped",
                    value
                );
                Err(e)
            }
        }
    }

    /// Merge a partial update. Name and type are never touched.
    pub async fn update(&self, id: Uuid, patch: EquipmentPatch) -> AppResult<Equipment> {
        if let Some(client_id) = patch.client_id {
            self.ensure_client(client_id).await?;
        }
        let mut equipment = self.get_by_id(id).await?;
        equipment.apply(patch)?;
        self.store
            .update(&equipment)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Remove a record; the counter is left alone so names are never reused
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.store.delete(id).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        self.store.list(filter).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Equipment>> {
        self.list(&EquipmentFilter::default()).await
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> AppResult<Vec<Equipment>> {
        self.list(&EquipmentFilter::by_client(client_id)).await
    }

    /// Existing records per type (for stats)
    pub async fn count_by_type(&self) -> AppResult<Vec<(EquipmentType, i64)>> {
        self.store.count_by_type().await
    }
}
