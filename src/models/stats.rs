//! Dashboard statistics model

use serde::Serialize;
use utoipa::ToSchema;

use super::EquipmentCounter;

/// Totals shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_clients: i64,
    pub total_equipment: i64,
    pub computers: i64,
    pub ups: i64,
    /// Names issued so far per type (deleted equipment included)
    pub counters: Vec<EquipmentCounter>,
}
