//! Dashboard statistics service

use crate::{
    error::AppResult,
    models::{EquipmentType, StatsSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn summary(&self) -> AppResult<StatsSummary> {
        let total_clients = self.repository.clients.count().await?;
        let by_type = self.repository.equipment.count_by_type().await?;
        let count_of = |kind: EquipmentType| {
            by_type
                .iter()
                .filter(|(t, _)| *t == kind)
                .map(|(_, n)| *n)
                .sum::<i64>()
        };
        let computers = count_of(EquipmentType::Computer);
        let ups = count_of(EquipmentType::Ups);

        Ok(StatsSummary {
            total_clients,
            total_equipment: computers + ups,
            computers,
            ups,
            counters: self.repository.counters.list().await?,
        })
    }
}
