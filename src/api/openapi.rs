//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{clients, counters, equipment, health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EquipTrack API",
        version = "1.0.0",
        description = "Client equipment inventory with sequential equipment names"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Counters
        counters::list_counters,
        counters::get_counter,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ReadinessResponse,
            crate::store::StorageMode,
            // Clients
            crate::models::Client,
            crate::models::CreateClient,
            crate::models::UpdateClient,
            // Equipment
            crate::models::EquipmentType,
            crate::models::Equipment,
            crate::models::CreateEquipment,
            crate::models::UpdateEquipment,
            crate::models::EquipmentCounter,
            // Stats
            crate::models::StatsSummary,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "clients", description = "Client management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "counters", description = "Equipment name counters"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Swagger UI plus the raw OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
