//! Equipment service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        CreateEquipment, Equipment, EquipmentCounter, EquipmentFilter, EquipmentType,
        UpdateEquipment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(filter).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    /// Create equipment; the response carries the generated name
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        let equipment = self.repository.equipment.create(data.into_new()?).await?;
        tracing::info!(name = %equipment.name, id = %equipment.id, "Equipment created");
        Ok(equipment)
    }

    pub async fn update(&self, id: Uuid, data: UpdateEquipment) -> AppResult<Equipment> {
        self.repository.equipment.update(id, data.into_patch()?).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.equipment.delete(id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        tracing::info!(id = %id, "Equipment deleted");
        Ok(())
    }

    /// All name counters
    pub async fn counters(&self) -> AppResult<Vec<EquipmentCounter>> {
        self.repository.counters.list().await
    }

    /// Name counter of one type
    pub async fn counter(&self, kind: EquipmentType) -> AppResult<EquipmentCounter> {
        let counter = self.repository.counters.get(kind).await?;
        Ok(EquipmentCounter {
            equipment_type: kind,
            counter,
        })
    }
}
