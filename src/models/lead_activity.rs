// src/models/lead_activity.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::ids::optional_id;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "activity_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    Ligacao,
    Email,
    Reuniao,
    Visita,
    Pedido,
    Cliente,
    Nota,
    Whatsapp,
    Proposta,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Ligacao => "LIGACAO",
            ActivityKind::Email => "EMAIL",
            ActivityKind::Reuniao => "REUNIAO",
            ActivityKind::Visita => "VISITA",
            ActivityKind::Pedido => "PEDIDO",
            ActivityKind::Cliente => "CLIENTE",
            ActivityKind::Nota => "NOTA",
            ActivityKind::Whatsapp => "WHATSAPP",
            ActivityKind::Proposta => "PROPOSTA",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LIGACAO" => Ok(ActivityKind::Ligacao),
            "EMAIL" => Ok(ActivityKind::Email),
            "REUNIAO" => Ok(ActivityKind::Reuniao),
            "VISITA" => Ok(ActivityKind::Visita),
            "PEDIDO" => Ok(ActivityKind::Pedido),
            "CLIENTE" => Ok(ActivityKind::Cliente),
            "NOTA" => Ok(ActivityKind::Nota),
            "WHATSAPP" => Ok(ActivityKind::Whatsapp),
            "PROPOSTA" => Ok(ActivityKind::Proposta),
            other => Err(format!("TIPO inválido: {other}")),
        }
    }
}

// AGUARDANDO e ATRASADO nascem na criação; REALIZADO só chega pelo ERP.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "activity_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityStatus {
    Aguardando,
    Atrasado,
    Realizado,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Aguardando => "AGUARDANDO",
            ActivityStatus::Atrasado => "ATRASADO",
            ActivityStatus::Realizado => "REALIZADO",
        }
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AGUARDANDO" => Ok(ActivityStatus::Aguardando),
            "ATRASADO" => Ok(ActivityStatus::Atrasado),
            "REALIZADO" => Ok(ActivityStatus::Realizado),
            other => Err(format!("STATUS inválido: {other}")),
        }
    }
}

// --- ATIVIDADE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeadActivity {
    pub codatividade: i64,
    pub codlead: Option<i64>,
    pub id_empresa: i64,
    pub tipo: ActivityKind,
    pub descricao: Option<String>,

    // DD/MM/YYYY HH24:MI:SS
    pub data_hora: String,
    pub data_inicio: String,
    pub data_fim: String,

    pub codusuario: Option<i64>,
    pub dados_complementares: Option<String>,
    pub cor: Option<String>,
    pub ordem: i64,
    pub ativo: String,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CreateActivityPayload {
    #[serde(default, deserialize_with = "optional_id")]
    #[schema(value_type = Option<String>, example = "42")]
    pub codlead: Option<i64>,
    pub tipo: ActivityKind,
    pub descricao: Option<String>,

    // ISO ou DD/MM/YYYY HH:MM:SS; ausente = agora
    #[schema(example = "2025-03-10T09:00:00")]
    pub data_inicio: Option<String>,
    // Ausente = DATA_INICIO
    pub data_fim: Option<String>,

    // Ausente = usuário do cabeçalho x-user-id
    pub codusuario: Option<i64>,
    pub dados_complementares: Option<String>,

    #[validate(length(max = 20, message = "invalid_color"))]
    #[schema(example = "#22c55e")]
    pub cor: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityListQuery {
    pub codlead: Option<i64>,
    /// 'S' (padrão) ou 'N'
    pub ativo: Option<String>,
}

// --- ATUALIZAÇÕES VIA ERP ---

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateActivityStatusRequest {
    #[serde(rename = "CODATIVIDADE")]
    #[schema(value_type = Option<String>, example = "1542")]
    pub codatividade: Option<Value>,

    #[serde(rename = "STATUS")]
    #[schema(example = "REALIZADO")]
    pub status: Option<String>,
}

/// ATIVO pode chegar como "S"/"N" ou booleano.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActiveFlagInput {
    Bool(bool),
    Text(String),
}

impl ActiveFlagInput {
    pub fn to_flag(&self) -> Result<&'static str, String> {
        match self {
            ActiveFlagInput::Bool(true) => Ok("S"),
            ActiveFlagInput::Bool(false) => Ok("N"),
            ActiveFlagInput::Text(text) => match text.trim().to_uppercase().as_str() {
                "S" | "TRUE" => Ok("S"),
                "N" | "FALSE" => Ok("N"),
                other => Err(format!("ATIVO inválido: {other}")),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UpdateActivityRequest {
    #[schema(value_type = Option<String>, example = "1542")]
    pub codatividade: Option<Value>,
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    #[schema(value_type = Option<String>, example = "S")]
    pub ativo: Option<ActiveFlagInput>,
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
    pub cor: Option<String>,
}
