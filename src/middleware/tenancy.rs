// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

// A empresa (ID_EMPRESA) que o chamador quer acessar.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub i64);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_ID_HEADER)
            .ok_or_else(|| {
                AppError::BadRequest("O cabeçalho X-Tenant-ID é obrigatório.".to_string())
            })?;

        let value_str = value.to_str().map_err(|_| {
            AppError::BadRequest("Cabeçalho X-Tenant-ID contém caracteres inválidos.".to_string())
        })?;

        let id_empresa = value_str.trim().parse::<i64>().map_err(|_| {
            AppError::BadRequest("Cabeçalho X-Tenant-ID inválido (não é um número).".to_string())
        })?;

        Ok(TenantContext(id_empresa))
    }
}
