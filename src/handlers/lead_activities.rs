// src/handlers/lead_activities.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{tenancy::TenantContext, user::UserContext},
    models::lead_activity::{
        ActivityListQuery, CreateActivityPayload, LeadActivity, UpdateActivityRequest,
        UpdateActivityStatusRequest,
    },
};

// =============================================================================
//  BANCO (ad_leads_atividades)
// =============================================================================

// GET /api/leads/atividades
#[utoipa::path(
    get,
    path = "/api/leads/atividades",
    tag = "Atividades",
    security(("tenant_header" = [])),
    responses(
        (status = 200, description = "Atividades, ORDEM mais alta primeiro", body = Vec<LeadActivity>)
    ),
    params(
        ActivityListQuery,
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ActivityListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let activities = app_state
        .lead_activity_service
        .list_activities(
            &app_state.db_pool,
            query.codlead,
            tenant.0,
            query.ativo.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(activities)))
}

// POST /api/leads/atividades
#[utoipa::path(
    post,
    path = "/api/leads/atividades",
    tag = "Atividades",
    security(("tenant_header" = [])),
    request_body = CreateActivityPayload,
    responses(
        (status = 201, description = "Atividade criada", body = LeadActivity),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA"),
        ("x-user-id" = Option<i64>, Header, description = "CODUSUARIO padrão")
    )
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    user: UserContext,
    Json(payload): Json<CreateActivityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let activity = app_state
        .lead_activity_service
        .create_activity(&app_state.db_pool, tenant.0, &payload, user.codusuario)
        .await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

// =============================================================================
//  ERP (DatasetSP.save)
// =============================================================================

// POST /api/leads/atividades/atualizar-status
#[utoipa::path(
    post,
    path = "/api/leads/atividades/atualizar-status",
    tag = "Atividades",
    request_body = UpdateActivityStatusRequest,
    responses(
        (status = 200, description = "Status gravado no ERP"),
        (status = 400, description = "CODATIVIDADE e STATUS são obrigatórios"),
        (status = 500, description = "Falha no login ou na gravação do ERP")
    )
)]
pub async fn update_activity_status(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateActivityStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    app_state.erp_service.update_status(payload).await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// POST /api/leads/atividades/atualizar
#[utoipa::path(
    post,
    path = "/api/leads/atividades/atualizar",
    tag = "Atividades",
    request_body = UpdateActivityRequest,
    responses(
        (status = 200, description = "Campos gravados no ERP"),
        (status = 400, description = "CODATIVIDADE é obrigatório"),
        (status = 500, description = "Falha no login ou na gravação do ERP")
    )
)]
pub async fn update_activity(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    app_state.erp_service.update_activity(payload).await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
