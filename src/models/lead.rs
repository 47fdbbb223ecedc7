// src/models/lead.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ids::optional_id;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    EmAndamento,
    Ganho,
    Perdido,
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Lead {
    pub codlead: i64,
    pub id_empresa: i64,
    pub nome: String,
    pub descricao: Option<String>,
    #[schema(value_type = f64)]
    pub valor: Decimal,
    pub codestagio: Option<String>,
    pub codfunil: Option<String>,

    // Datas já formatadas como DD/MM/YYYY
    pub data_vencimento: Option<String>,

    pub tipo_tag: Option<String>,
    pub cor_tag: String,
    pub codparc: Option<i64>,
    pub codusuario: Option<i64>,
    pub ativo: String,
    pub data_criacao: String,
    pub data_atualizacao: String,
    pub status_lead: LeadStatus,
    pub motivo_perda: Option<String>,
    pub data_conclusao: Option<String>,
}

/// Corpo do upsert: com `CODLEAD` atualiza, sem ele cria.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SaveLeadPayload {
    #[serde(default, deserialize_with = "optional_id")]
    #[schema(value_type = Option<String>, example = "42")]
    pub codlead: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "required"))]
    #[schema(example = "Distribuidora Horizonte")]
    pub nome: String,

    pub descricao: Option<String>,
    #[schema(value_type = Option<f64>, example = 15000.0)]
    pub valor: Option<Decimal>,
    pub codestagio: Option<String>,
    pub codfunil: Option<String>,

    // Aceita YYYY-MM-DD ou DD/MM/YYYY
    #[schema(example = "2025-03-31")]
    pub data_vencimento: Option<String>,

    pub tipo_tag: Option<String>,
    #[schema(example = "#3b82f6")]
    pub cor_tag: Option<String>,

    #[serde(default, deserialize_with = "optional_id")]
    #[schema(value_type = Option<String>)]
    pub codparc: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UpdateStagePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "2")]
    pub codestagio: String,
}
