use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use service::registration::AdminAction;

use crate::errors::ApiError;
use crate::observability;
use crate::routes::ServerState;
use crate::views;

#[derive(Deserialize)]
pub struct AdminKeyQuery {
    #[serde(default)]
    pub key: Option<String>,
}

impl AdminKeyQuery {
    fn key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }
}

#[derive(Deserialize)]
pub struct SetCountForm {
    // A missing field flows through as an invalid value rather than an
    // extractor rejection.
    #[serde(default, rename = "newCount")]
    pub new_count: String,
}

/// Rendered management view; forbidden unless the key matches.
pub async fn admin_view(
    State(state): State<ServerState>,
    Query(q): Query<AdminKeyQuery>,
) -> Result<Html<String>, ApiError> {
    state.service.authorize_admin(q.key())?;
    let rows = state.service.status_snapshot().await;
    Ok(Html(views::admin_page(&rows, q.key())))
}

async fn adjust(
    state: &ServerState,
    program: &str,
    action: AdminAction,
    key: &str,
) -> Result<Redirect, ApiError> {
    state.service.admin_adjust(program, action, key).await?;
    observability::ADMIN_ADJUSTMENTS_TOTAL.inc();
    // Back to the management view, keeping it authorized.
    Ok(Redirect::to(&format!("/admin?key={key}")))
}

pub async fn admin_add(
    State(state): State<ServerState>,
    Path(program): Path<String>,
    Query(q): Query<AdminKeyQuery>,
) -> Result<Redirect, ApiError> {
    adjust(&state, &program, AdminAction::Increment, q.key()).await
}

pub async fn admin_cancel(
    State(state): State<ServerState>,
    Path(program): Path<String>,
    Query(q): Query<AdminKeyQuery>,
) -> Result<Redirect, ApiError> {
    adjust(&state, &program, AdminAction::Decrement, q.key()).await
}

pub async fn admin_set(
    State(state): State<ServerState>,
    Path(program): Path<String>,
    Query(q): Query<AdminKeyQuery>,
    Form(form): Form<SetCountForm>,
) -> Result<Redirect, ApiError> {
    adjust(&state, &program, AdminAction::Set(form.new_count), q.key()).await
}
