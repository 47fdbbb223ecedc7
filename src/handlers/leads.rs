// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{tenancy::TenantContext, user::UserContext},
    models::lead::{Lead, SaveLeadPayload, UpdateStagePayload},
    services::lead_service::SaveOutcome,
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    security(("tenant_header" = [])),
    responses(
        (status = 200, description = "Leads ativos da empresa", body = Vec<Lead>),
        (status = 400, description = "Cabeçalhos inválidos")
    ),
    params(
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA"),
        ("x-user-id" = Option<i64>, Header, description = "CODUSUARIO do chamador"),
        ("x-user-admin" = Option<String>, Header, description = "S = administrador")
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    user: UserContext,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state
        .lead_service
        .list_leads(&app_state.db_pool, tenant.0, user.codusuario, user.is_admin)
        .await?;

    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    security(("tenant_header" = [])),
    request_body = SaveLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "CODLEAD não existe na empresa")
    ),
    params(
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA"),
        ("x-user-id" = Option<i64>, Header, description = "CODUSUARIO criador")
    )
)]
pub async fn save_lead(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    user: UserContext,
    Json(payload): Json<SaveLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = app_state
        .lead_service
        .save_lead(&app_state.db_pool, tenant.0, &payload, user.codusuario)
        .await?;

    Ok(match outcome {
        SaveOutcome::Created(lead) => (StatusCode::CREATED, Json(lead)),
        SaveOutcome::Updated(lead) => (StatusCode::OK, Json(lead)),
    })
}

// PATCH /api/leads/{codlead}/estagio
#[utoipa::path(
    patch,
    path = "/api/leads/{codlead}/estagio",
    tag = "Leads",
    security(("tenant_header" = [])),
    request_body = UpdateStagePayload,
    responses(
        (status = 200, description = "Estágio atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("codlead" = i64, Path, description = "CODLEAD"),
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn update_stage(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(codlead): Path<i64>,
    Json(payload): Json<UpdateStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .update_stage(&app_state.db_pool, codlead, &payload.codestagio, tenant.0)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {codlead} não encontrado")))?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{codlead}
#[utoipa::path(
    delete,
    path = "/api/leads/{codlead}",
    tag = "Leads",
    security(("tenant_header" = [])),
    responses(
        (status = 204, description = "Lead inativado"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("codlead" = i64, Path, description = "CODLEAD"),
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(codlead): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .lead_service
        .delete_lead(&app_state.db_pool, codlead, tenant.0)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
