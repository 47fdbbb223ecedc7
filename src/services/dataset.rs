// src/services/dataset.rs
//
// Montagem do corpo do DatasetSP.save: campos em ordem e valores posicionais.

use serde_json::{Map, Value};

use crate::{
    common::{dates::format_erp_timestamp, error::AppError},
    models::{
        erp::{DatasetRecord, DatasetSaveBody, DatasetSaveRequest, DATASET_SAVE_SERVICE},
        lead_activity::{ActivityKind, ActivityStatus, UpdateActivityRequest},
    },
};

/// Formata um campo a partir da origem; `None` = campo não enviado.
pub type FieldFormatter<T> = fn(&T) -> Option<Value>;

/// Atualização parcial de um registro. A posição de cada campo em `fields`
/// é a chave do seu valor em `values` ("0", "1", ...).
#[derive(Debug, Clone)]
pub struct DatasetUpdate {
    entity_name: String,
    pk: Map<String, Value>,
    fields: Vec<String>,
    values: Map<String, Value>,
}

impl DatasetUpdate {
    pub fn new(entity_name: &str, pk_field: &str, pk_value: impl Into<String>) -> Self {
        let mut pk = Map::new();
        pk.insert(pk_field.to_string(), Value::String(pk_value.into()));

        Self {
            entity_name: entity_name.to_string(),
            pk,
            fields: Vec::new(),
            values: Map::new(),
        }
    }

    pub fn push(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let index = self.fields.len();
        self.fields.push(field.to_string());
        self.values.insert(index.to_string(), value.into());
        self
    }

    /// Aplica uma tabela ordenada de (campo, formatador) sobre `source`.
    pub fn apply<T>(&mut self, source: &T, table: &[(&str, FieldFormatter<T>)]) -> &mut Self {
        for (field, format) in table {
            if let Some(value) = format(source) {
                self.push(field, value);
            }
        }
        self
    }

    pub fn into_request(self) -> DatasetSaveRequest {
        DatasetSaveRequest {
            service_name: DATASET_SAVE_SERVICE.to_string(),
            request_body: DatasetSaveBody {
                entity_name: self.entity_name,
                stand_alone: false,
                fields: self.fields,
                records: vec![DatasetRecord {
                    pk: self.pk,
                    values: self.values,
                }],
            },
        }
    }
}

// --- ATIVIDADES ---

pub const ACTIVITY_ENTITY: &str = "AD_ADLEADSATIVIDADES";
pub const ACTIVITY_PK: &str = "CODATIVIDADE";

/// Campos opcionais de uma atividade, já validados.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<ActivityKind>,
    pub cor: Option<String>,
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    pub ativo: Option<&'static str>,
}

impl ActivityPatch {
    pub fn from_request(request: &UpdateActivityRequest) -> Result<Self, AppError> {
        let tipo = request
            .tipo
            .as_deref()
            .map(str::parse::<ActivityKind>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        let ativo = request
            .ativo
            .as_ref()
            .map(|flag| flag.to_flag())
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(Self {
            titulo: request.titulo.clone(),
            descricao: request.descricao.clone(),
            tipo,
            cor: request.cor.clone(),
            data_inicio: request.data_inicio.clone().filter(|d| !d.is_empty()),
            data_fim: request.data_fim.clone().filter(|d| !d.is_empty()),
            ativo,
        })
    }
}

// TITULO e DESCRICAO dividem o mesmo campo no ERP: "TITULO|DESCRICAO".
fn combined_description(patch: &ActivityPatch) -> Option<Value> {
    match (&patch.titulo, &patch.descricao) {
        (Some(titulo), Some(descricao)) => Some(Value::from(format!("{titulo}|{descricao}"))),
        (Some(titulo), None) => Some(Value::from(titulo.as_str())),
        (None, Some(descricao)) => Some(Value::from(descricao.as_str())),
        (None, None) => None,
    }
}

fn kind(patch: &ActivityPatch) -> Option<Value> {
    patch.tipo.map(|t| Value::from(t.as_str()))
}

fn color(patch: &ActivityPatch) -> Option<Value> {
    patch.cor.as_deref().map(Value::from)
}

fn start_date(patch: &ActivityPatch) -> Option<Value> {
    patch.data_inicio.as_deref().map(|d| Value::from(format_erp_timestamp(d)))
}

fn end_date(patch: &ActivityPatch) -> Option<Value> {
    patch.data_fim.as_deref().map(|d| Value::from(format_erp_timestamp(d)))
}

fn active(patch: &ActivityPatch) -> Option<Value> {
    patch.ativo.map(Value::from)
}

/// A ordem desta tabela é a ordem dos campos no payload.
pub const ACTIVITY_PATCH_FIELDS: [(&str, FieldFormatter<ActivityPatch>); 6] = [
    ("DESCRICAO", combined_description),
    ("TIPO", kind),
    ("COR", color),
    ("DATA_INICIO", start_date),
    ("DATA_FIM", end_date),
    ("ATIVO", active),
];

pub fn activity_patch_request(activity_id: &str, patch: &ActivityPatch) -> DatasetSaveRequest {
    let mut update = DatasetUpdate::new(ACTIVITY_ENTITY, ACTIVITY_PK, activity_id);
    update.apply(patch, &ACTIVITY_PATCH_FIELDS);
    update.into_request()
}

pub fn activity_status_request(activity_id: &str, status: ActivityStatus) -> DatasetSaveRequest {
    let mut update = DatasetUpdate::new(ACTIVITY_ENTITY, ACTIVITY_PK, activity_id);
    update.push("STATUS", status.as_str());
    update.into_request()
}
