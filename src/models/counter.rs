//! Equipment counter model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::EquipmentType;

/// Number of names ever issued for one equipment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentCounter {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub equipment_type: EquipmentType,
    pub counter: i64,
}
