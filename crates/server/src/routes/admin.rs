//! `/api/v1/admin`: every route checks the caller's role first.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use service::admin::{
    AdminService, Analytics, AuditLogPage, CreateUserRequest, CreateUserResponse, UpdateUserStatusRequest,
    UpdateUserStatusResponse, AUDIT_DEFAULT_LIMIT,
};
use service::query::Page;

use crate::errors::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub table_name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(create_user))
        .route("/users/update-status", post(update_user_status))
        .route("/analytics", get(analytics))
        .route("/audit-logs", get(audit_logs))
}

async fn admin_service<'a>(state: &'a AppState, caller: Caller) -> Result<AdminService<'a>, ApiError> {
    let caller = caller.require()?;
    let admin = AdminService::new(state.conn().await?);
    admin.require_admin(&caller).await?;
    Ok(admin)
}

pub async fn create_user(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let admin = admin_service(&state, caller).await?;
    let Json(req) = body?;
    Ok(Json(admin.create_user(req).await?))
}

pub async fn update_user_status(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<UpdateUserStatusRequest>, JsonRejection>,
) -> Result<Json<UpdateUserStatusResponse>, ApiError> {
    let admin = admin_service(&state, caller).await?;
    let Json(req) = body?;
    Ok(Json(admin.update_user_status(req).await?))
}

pub async fn analytics(State(state): State<AppState>, caller: Caller) -> Result<Json<Analytics>, ApiError> {
    let admin = admin_service(&state, caller).await?;
    Ok(Json(admin.analytics().await?))
}

pub async fn audit_logs(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<AuditLogParams>, QueryRejection>,
) -> Result<Json<AuditLogPage>, ApiError> {
    let admin = admin_service(&state, caller).await?;
    let Query(params) = params?;
    let page = Page::with_default(params.skip, params.limit, AUDIT_DEFAULT_LIMIT)?;
    Ok(Json(admin.audit_logs(page, params.table_name.as_deref()).await?))
}
