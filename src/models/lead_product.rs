// src/models/lead_product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Item (produto) de um lead
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeadProduct {
    pub coditem: i64,
    pub codlead: i64,
    pub id_empresa: i64,
    pub codprod: i64,
    pub descrprod: String,
    #[schema(value_type = f64)]
    pub quantidade: Decimal,
    #[schema(value_type = f64)]
    pub vlrunit: Decimal,
    #[schema(value_type = f64)]
    pub vlrtotal: Decimal,
    pub ativo: String,
    pub data_inclusao: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AddLeadProductPayload {
    #[schema(example = 1021)]
    pub codprod: i64,

    #[validate(length(min = 1, max = 200, message = "required"))]
    #[schema(example = "Caixa organizadora 40L")]
    pub descrprod: String,

    #[schema(value_type = f64, example = 3.0)]
    pub quantidade: Decimal,

    #[schema(value_type = f64, example = 49.9)]
    pub vlrunit: Decimal,

    // Se omitido, é QUANTIDADE x VLRUNIT
    #[schema(value_type = Option<f64>)]
    pub vlrtotal: Option<Decimal>,
}

impl AddLeadProductPayload {
    /// `None` quando QUANTIDADE x VLRUNIT estoura o `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        match self.vlrtotal {
            Some(total) => Some(total),
            None => self.quantidade.checked_mul(self.vlrunit),
        }
    }
}

// Resposta da remoção: o novo valor do lead
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRemoval {
    #[schema(value_type = f64)]
    pub novo_valor_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload(vlrtotal: Option<&str>) -> AddLeadProductPayload {
        AddLeadProductPayload {
            codprod: 1,
            descrprod: "Produto".into(),
            quantidade: Decimal::from_str("3").unwrap(),
            vlrunit: Decimal::from_str("49.90").unwrap(),
            vlrtotal: vlrtotal.map(|v| Decimal::from_str(v).unwrap()),
        }
    }

    #[test]
    fn line_total_defaults_to_quantity_times_price() {
        assert_eq!(payload(None).line_total(), Some(Decimal::from_str("149.70").unwrap()));
    }

    #[test]
    fn explicit_line_total_wins() {
        assert_eq!(
            payload(Some("140.00")).line_total(),
            Some(Decimal::from_str("140.00").unwrap())
        );
    }

    #[test]
    fn overflowing_product_has_no_line_total() {
        let mut huge = payload(None);
        huge.quantidade = Decimal::from_str("100000000000000000000").unwrap();
        huge.vlrunit = Decimal::from_str("100000000000000000000").unwrap();
        assert_eq!(huge.line_total(), None);
    }
}
