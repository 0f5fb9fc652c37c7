//! Statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::StatsSummary, AppState};

/// Dashboard totals
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Totals", body = StatsSummary)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsSummary>> {
    let summary = state.services.stats.summary().await?;
    Ok(Json(summary))
}
