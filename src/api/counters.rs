//! Equipment name counter endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{EquipmentCounter, EquipmentType},
    AppState,
};

use super::ApiPath;

/// List the name counter of every equipment type
#[utoipa::path(
    get,
    path = "/counters",
    tag = "counters",
    responses(
        (status = 200, description = "Counters", body = Vec<EquipmentCounter>)
    )
)]
pub async fn list_counters(State(state): State<AppState>) -> AppResult<Json<Vec<EquipmentCounter>>> {
    let counters = state.services.equipment.counters().await?;
    Ok(Json(counters))
}

/// Get the name counter of one equipment type
#[utoipa::path(
    get,
    path = "/counters/{type}",
    tag = "counters",
    params(("type" = EquipmentType, Path, description = "Equipment type")),
    responses(
        (status = 200, description = "Counter", body = EquipmentCounter),
        (status = 404, description = "Counter not initialized", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_counter(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<EquipmentType>,
) -> AppResult<Json<EquipmentCounter>> {
    let counter = state.services.equipment.counter(kind).await?;
    Ok(Json(counter))
}
