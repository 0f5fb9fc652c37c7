//! Client API endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Client, CreateClient, UpdateClient},
    AppState,
};

use super::{ApiPath, ValidatedJson};

/// List all clients
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    responses(
        (status = 200, description = "Client list", body = Vec<Client>)
    )
)]
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state.services.clients.list().await?;
    Ok(Json(clients))
}

/// Get client by ID
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client details", body = Client),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Client>> {
    let client = state.services.clients.get_by_id(id).await?;
    Ok(Json(client))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state.services.clients.create(data).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(data): ValidatedJson<UpdateClient>,
) -> AppResult<Json<Client>> {
    let client = state.services.clients.update(id, data).await?;
    Ok(Json(client))
}

/// Delete a client (refused while it still owns equipment)
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Client still owns equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
