//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{optional_text, patch_text, required_text};
use crate::error::{AppError, AppResult, FieldError};

/// Kind of equipment; each kind has its own name counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    Computer,
    Ups,
}

impl EquipmentType {
    /// Every known type, in seeding order
    pub const ALL: [EquipmentType; 2] = [EquipmentType::Computer, EquipmentType::Ups];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Computer => "computer",
            EquipmentType::Ups => "ups",
        }
    }
}

impl std::fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "computer" => Ok(EquipmentType::Computer),
            "ups" => Ok(EquipmentType::Ups),
            _ => Err(format!("Invalid equipment type: {}", s)),
        }
    }
}

// Stored as plain text
impl sqlx::Type<Postgres> for EquipmentType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for EquipmentType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for EquipmentType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    /// Generated display name (P0001, N0001, ...), immutable
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub equipment_type: EquipmentType,
    pub client_id: Uuid,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub sector: String,
    /// Computers only
    pub operator: Option<String>,
    /// UPS only
    pub battery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Build a fresh record around an already minted name
    pub fn from_new(name: String, data: NewEquipment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            equipment_type: data.equipment_type,
            client_id: data.client_id,
            brand: data.brand,
            model: data.model,
            serial_number: data.serial_number,
            sector: data.sector,
            operator: data.operator,
            battery_date: data.battery_date,
            observations: data.observations,
            photo_url: data.photo_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the record. Name and type never change.
    pub fn apply(&mut self, patch: EquipmentPatch) -> AppResult<()> {
        let mut errors = Vec::new();
        if let Some(Some(_)) = patch.operator {
            if self.equipment_type != EquipmentType::Computer {
                errors.push(FieldError::new("operator", "Only computers have an operator"));
            }
        }
        if let Some(Some(_)) = patch.battery_date {
            if self.equipment_type != EquipmentType::Ups {
                errors.push(FieldError::new("batteryDate", "Only UPS units have a battery date"));
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(serial_number) = patch.serial_number {
            self.serial_number = serial_number;
        }
        if let Some(sector) = patch.sector {
            self.sector = sector;
        }
        if let Some(operator) = patch.operator {
            self.operator = operator;
        }
        if let Some(battery_date) = patch.battery_date {
            self.battery_date = battery_date;
        }
        if let Some(observations) = patch.observations {
            self.observations = observations;
        }
        if let Some(photo_url) = patch.photo_url {
            self.photo_url = photo_url;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Create equipment request. The name is generated server-side.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Brand must be 1 to 100 characters"))]
    pub brand: String,
    #[validate(length(min = 1, max = 100, message = "Model must be 1 to 100 characters"))]
    pub model: String,
    #[validate(length(min = 1, max = 100, message = "Serial number must be 1 to 100 characters"))]
    pub serial_number: String,
    #[validate(length(min = 1, max = 100, message = "Sector must be 1 to 100 characters"))]
    pub sector: String,
    #[validate(length(max = 100, message = "Operator must be at most 100 characters"))]
    pub operator: Option<String>,
    /// YYYY-MM-DD or RFC 3339
    pub battery_date: Option<String>,
    pub observations: Option<String>,
    pub photo_url: Option<String>,
}

/// Validated creation data handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipment {
    pub equipment_type: EquipmentType,
    pub client_id: Uuid,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub sector: String,
    pub operator: Option<String>,
    pub battery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub photo_url: Option<String>,
}

impl CreateEquipment {
    /// Normalize the request and check the rules that span several fields
    pub fn into_new(self) -> AppResult<NewEquipment> {
        let mut errors = Vec::new();

        let brand = required_text("brand", self.brand, &mut errors);
        let model = required_text("model", self.model, &mut errors);
        let serial_number = required_text("serialNumber", self.serial_number, &mut errors);
        let sector = required_text("sector", self.sector, &mut errors);

        let operator = optional_text(self.operator);
        if operator.is_some() && self.equipment_type != EquipmentType::Computer {
            errors.push(FieldError::new("operator", "Only computers have an operator"));
        }

        let battery_date = match optional_text(self.battery_date) {
            Some(raw) => match parse_battery_date(&raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            None => None,
        };
        if battery_date.is_some() && self.equipment_type != EquipmentType::Ups {
            errors.push(FieldError::new("batteryDate", "Only UPS units have a battery date"));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewEquipment {
            equipment_type: self.equipment_type,
            client_id: self.client_id,
            brand,
            model,
            serial_number,
            sector,
            operator,
            battery_date,
            observations: optional_text(self.observations),
            photo_url: optional_text(self.photo_url),
        })
    }
}

/// Update equipment request. `name` and `type` are not updatable and are ignored.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    pub client_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Brand must be 1 to 100 characters"))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Model must be 1 to 100 characters"))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Serial number must be 1 to 100 characters"))]
    pub serial_number: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Sector must be 1 to 100 characters"))]
    pub sector: Option<String>,
    /// Empty string clears the value
    #[validate(length(max = 100, message = "Operator must be at most 100 characters"))]
    pub operator: Option<String>,
    /// Empty string clears the value
    pub battery_date: Option<String>,
    pub observations: Option<String>,
    pub photo_url: Option<String>,
}

/// Validated partial update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentPatch {
    pub client_id: Option<Uuid>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub sector: Option<String>,
    pub operator: Option<Option<String>>,
    pub battery_date: Option<Option<DateTime<Utc>>>,
    pub observations: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
}

impl UpdateEquipment {
    pub fn into_patch(self) -> AppResult<EquipmentPatch> {
        let mut errors = Vec::new();

        let mut required = |field: &str, value: Option<String>| {
            value.map(|v| required_text(field, v, &mut errors))
        };
        let brand = required("brand", self.brand);
        let model = required("model", self.model);
        let serial_number = required("serialNumber", self.serial_number);
        let sector = required("sector", self.sector);

        let battery_date = match patch_text(self.battery_date) {
            Some(Some(raw)) => match parse_battery_date(&raw) {
                Ok(date) => Some(Some(date)),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            Some(None) => Some(None),
            None => None,
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(EquipmentPatch {
            client_id: self.client_id,
            brand,
            model,
            serial_number,
            sector,
            operator: patch_text(self.operator),
            battery_date,
            observations: patch_text(self.observations),
            photo_url: patch_text(self.photo_url),
        })
    }
}

/// Accepts a calendar date (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_battery_date(raw: &str) -> Result<DateTime<Utc>, FieldError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| FieldError::new("batteryDate", "Invalid date, expected YYYY-MM-DD"))
}

/// Query parameters for listing equipment
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EquipmentQuery {
    /// Only equipment owned by this client
    pub client_id: Option<Uuid>,
    /// Only equipment of this type
    #[serde(rename = "type")]
    pub equipment_type: Option<EquipmentType>,
    /// Case-insensitive match on name, brand, model, sector or operator
    pub search: Option<String>,
}

/// Listing filter shared by both storage backends
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentFilter {
    pub client_id: Option<Uuid>,
    pub equipment_type: Option<EquipmentType>,
    pub search: Option<String>,
}

impl EquipmentFilter {
    pub fn by_client(client_id: Uuid) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, equipment: &Equipment) -> bool {
        if self.client_id.is_some_and(|id| id != equipment.client_id) {
            return false;
        }
        if self
            .equipment_type
            .is_some_and(|t| t != equipment.equipment_type)
        {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                [
                    Some(&equipment.name),
                    Some(&equipment.brand),
                    Some(&equipment.model),
                    Some(&equipment.sector),
                    equipment.operator.as_ref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

impl From<EquipmentQuery> for EquipmentFilter {
    fn from(query: EquipmentQuery) -> Self {
        Self {
            client_id: query.client_id,
            equipment_type: query.equipment_type,
            search: optional_text(query.search),
        }
    }
}
