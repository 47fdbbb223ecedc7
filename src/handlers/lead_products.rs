// src/handlers/lead_products.rs

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
    middleware::tenancy::TenantContext,
    models::lead_product::{AddLeadProductPayload, LeadProduct, ProductRemoval},
};

// GET /api/leads/{codlead}/produtos
#[utoipa::path(
    get,
    path = "/api/leads/{codlead}/produtos",
    tag = "Produtos do Lead",
    security(("tenant_header" = [])),
    responses(
        (status = 200, description = "Itens ativos do lead", body = Vec<LeadProduct>)
    ),
    params(
        ("codlead" = i64, Path, description = "CODLEAD"),
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(codlead): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .lead_product_service
        .list_products(&app_state.db_pool, codlead, tenant.0)
        .await?;

    Ok((StatusCode::OK, Json(products)))
}

// POST /api/leads/{codlead}/produtos
#[utoipa::path(
    post,
    path = "/api/leads/{codlead}/produtos",
    tag = "Produtos do Lead",
    security(("tenant_header" = [])),
    request_body = AddLeadProductPayload,
    responses(
        (status = 201, description = "Item adicionado; VALOR do lead recalculado", body = LeadProduct),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("codlead" = i64, Path, description = "CODLEAD"),
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn add_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(codlead): Path<i64>,
    Json(payload): Json<AddLeadProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .lead_product_service
        .add_product(&app_state.db_pool, codlead, tenant.0, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// DELETE /api/leads/{codlead}/produtos/{coditem}
#[utoipa::path(
    delete,
    path = "/api/leads/{codlead}/produtos/{coditem}",
    tag = "Produtos do Lead",
    security(("tenant_header" = [])),
    responses(
        (status = 200, description = "Item inativado", body = ProductRemoval),
        (status = 404, description = "Lead ou item não encontrado")
    ),
    params(
        ("codlead" = i64, Path, description = "CODLEAD"),
        ("coditem" = i64, Path, description = "CODITEM"),
        ("x-tenant-id" = i64, Header, description = "ID_EMPRESA")
    )
)]
pub async fn remove_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path((codlead, coditem)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let removal = app_state
        .lead_product_service
        .remove_product(&app_state.db_pool, coditem, codlead, tenant.0)
        .await?;

    Ok((StatusCode::OK, Json(removal)))
}
