// src/middleware/user.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::common::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

// Quem está chamando. A autenticação de verdade fica no gateway à frente deste serviço.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserContext {
    pub codusuario: Option<i64>,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        from_headers(&parts.headers)
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn from_headers(headers: &HeaderMap) -> Result<UserContext, AppError> {
    let codusuario = header_value(headers, USER_ID_HEADER)
        .map(|raw| {
            raw.parse::<i64>().map_err(|_| {
                AppError::BadRequest("Cabeçalho X-User-ID inválido (não é um número).".to_string())
            })
        })
        .transpose()?;

    let is_admin = header_value(headers, USER_ADMIN_HEADER)
        .map(|raw| matches!(raw.to_uppercase().as_str(), "S" | "TRUE" | "1"))
        .unwrap_or(false);

    Ok(UserContext {
        codusuario,
        is_admin,
    })
}
