// src/models/ids.rs
//
// Identificadores (CODLEAD, CODPARC, CODATIVIDADE) chegam do frontend como
// texto ou número. Ausente, nulo, vazio ou zero contam como "não informado".

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Converte o identificador recebido (texto ou número) para texto.
pub fn record_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// `deserialize_with` para ids numéricos: aceita `42`, `"42"`; `""`, `null` e `0` viram `None`.
/// Use junto com `#[serde(default)]`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;

    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(_)) | Some(Value::Number(_)) => match record_id(raw.as_ref()) {
            None => Ok(None),
            Some(text) => text
                .parse::<i64>()
                .map(|id| (id != 0).then_some(id))
                .map_err(|_| D::Error::custom(format!("identificador inválido: {text}"))),
        },
        Some(other) => Err(D::Error::custom(format!("identificador inválido: {other}"))),
    }
}
