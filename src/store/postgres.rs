//! PostgreSQL storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{ClientStore, CounterStore, EquipmentStore};
use crate::{
    error::{AppError, AppResult},
    models::{Client, Equipment, EquipmentCounter, EquipmentFilter, EquipmentType},
};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// SQLSTATE of a database-side error, if any
fn sql_state(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Map constraint violations raised while writing an equipment row
fn equipment_write_error(e: sqlx::Error, name: &str) -> AppError {
    match sql_state(&e).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => AppError::field("clientId", "Client not found"),
        Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(format!("Equipment name {} is already taken", name))
        }
        _ => AppError::Database(e),
    }
}

/// Escape LIKE wildcards in user input
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CounterStore for PgStore {
    async fn seed(&self) -> AppResult<()> {
        for kind in EquipmentType::ALL {
            sqlx::query(
                "INSERT INTO equipment_counters (type, counter) VALUES ($1, 0) ON CONFLICT (type) DO NOTHING",
            )
            .bind(kind)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn get(&self, kind: EquipmentType) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT counter FROM equipment_counters WHERE type = $1")
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No counter for equipment type {}", kind)))
    }

    async fn increment_and_get(&self, kind: EquipmentType) -> AppResult<i64> {
        // Row-level lock taken by UPDATE serializes concurrent callers
        sqlx::query_scalar::<_, i64>(
            "UPDATE equipment_counters SET counter = counter + 1 WHERE type = $1 RETURNING counter",
        )
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CounterNotInitialized(kind))
    }

    async fn list(&self) -> AppResult<Vec<EquipmentCounter>> {
        let rows = sqlx::query_as::<_, EquipmentCounter>(
            "SELECT type, counter FROM equipment_counters ORDER BY type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn list(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name, created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, client: &Client) -> AppResult<Client> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.description)
        .bind(client.created_at)
        .bind(client.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, client: &Client) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.description)
        .bind(client.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => AppError::ReferenceInUse(format!(
                    "Client {} still owns equipment",
                    id
                )),
                _ => AppError::Database(e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl EquipmentStore for PgStore {
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.client_id.is_some() {
            conditions.push(format!("client_id = ${}", idx));
            idx += 1;
        }
        if filter.equipment_type.is_some() {
            conditions.push(format!("type = ${}", idx));
            idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${0} OR brand ILIKE ${0} OR model ILIKE ${0} OR sector ILIKE ${0} OR operator ILIKE ${0})",
                idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT * FROM equipment {} ORDER BY name", where_clause);

        let mut builder = sqlx::query_as::<_, Equipment>(&query);
        if let Some(client_id) = filter.client_id {
            builder = builder.bind(client_id);
        }
        if let Some(kind) = filter.equipment_type {
            builder = builder.bind(kind);
        }
        if let Some(term) = &filter.search {
            builder = builder.bind(like_pattern(term));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                id, name, type, client_id, brand, model, serial_number, sector,
                operator, battery_date, observations, photo_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(equipment.id)
        .bind(&equipment.name)
        .bind(equipment.equipment_type)
        .bind(equipment.client_id)
        .bind(&equipment.brand)
        .bind(&equipment.model)
        .bind(&equipment.serial_number)
        .bind(&equipment.sector)
        .bind(&equipment.operator)
        .bind(equipment.battery_date)
        .bind(&equipment.observations)
        .bind(&equipment.photo_url)
        .bind(equipment.created_at)
        .bind(equipment.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| equipment_write_error(e, &equipment.name))
    }

    async fn update(&self, equipment: &Equipment) -> AppResult<Option<Equipment>> {
        // name and type are deliberately absent from the SET list
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET
                client_id = $2, brand = $3, model = $4, serial_number = $5, sector = $6,
                operator = $7, battery_date = $8, observations = $9, photo_url = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(equipment.id)
        .bind(equipment.client_id)
        .bind(&equipment.brand)
        .bind(&equipment.model)
        .bind(&equipment.serial_number)
        .bind(&equipment.sector)
        .bind(&equipment.operator)
        .bind(equipment.battery_date)
        .bind(&equipment.observations)
        .bind(&equipment.photo_url)
        .bind(equipment.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| equipment_write_error(e, &equipment.name))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_type(&self) -> AppResult<Vec<(EquipmentType, i64)>> {
        let rows = sqlx::query_as::<_, (EquipmentType, i64)>(
            "SELECT type, COUNT(*) FROM equipment GROUP BY type ORDER BY type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
