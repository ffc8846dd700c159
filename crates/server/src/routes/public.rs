use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::observability;
use crate::routes::ServerState;
use crate::views;

#[derive(Serialize, ToSchema)]
pub struct CheckLimitResponse {
    pub full: bool,
    pub count: u64,
    pub limit: u64,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(rename = "newCount")]
    pub new_count: u64,
}

#[utoipa::path(
    get,
    path = "/check-limit/{program}",
    tag = "registration",
    params(("program" = String, Path, description = "Program identifier")),
    responses(
        (status = 200, description = "OK", body = CheckLimitResponse),
        (status = 404, description = "Unknown program")
    )
)]
pub async fn check_limit(
    State(state): State<ServerState>,
    Path(program): Path<String>,
) -> Result<Json<CheckLimitResponse>, ApiError> {
    let status = state.service.check_limit(&program).await?;
    Ok(Json(CheckLimitResponse {
        full: status.full,
        count: status.count,
        limit: status.limit,
    }))
}

#[utoipa::path(
    post,
    path = "/register/{program}",
    tag = "registration",
    params(("program" = String, Path, description = "Program identifier")),
    responses(
        (status = 200, description = "Registered", body = RegisterResponse),
        (status = 404, description = "Unknown program")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    Path(program): Path<String>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let new_count = state.service.register(&program).await?;
    observability::REGISTRATIONS_TOTAL.inc();
    Ok(Json(RegisterResponse { success: true, new_count }))
}

/// Human-readable snapshot of every program, in catalog order.
pub async fn status_page(State(state): State<ServerState>) -> Html<String> {
    let rows = state.service.status_snapshot().await;
    Html(views::status_page(&rows))
}
