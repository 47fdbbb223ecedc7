// src/models/erp.rs
//
// Corpo do serviço genérico `DatasetSP.save` do Sankhya.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DATASET_SAVE_SERVICE: &str = "DatasetSP.save";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSaveRequest {
    pub service_name: String,
    pub request_body: DatasetSaveBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSaveBody {
    pub entity_name: String,
    pub stand_alone: bool,
    pub fields: Vec<String>,
    pub records: Vec<DatasetRecord>,
}

/// `values` é posicional: a chave "i" corresponde a `fields[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetRecord {
    pub pk: Map<String, Value>,
    pub values: Map<String, Value>,
}

// Resposta do /login. O token pode vir em qualquer um dos dois campos.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "bearerToken")]
    pub bearer_token: Option<String>,
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn into_token(self) -> Option<String> {
        [self.bearer_token, self.token]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }
}

// Envelope de resposta dos serviços do gateway ("0" = erro)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub status: Option<String>,
    pub status_message: Option<String>,
}
