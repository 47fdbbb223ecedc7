// src/services/lead_product_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{LeadProductRepository, LeadRepository},
    models::lead_product::{AddLeadProductPayload, LeadProduct, ProductRemoval},
};

#[derive(Clone)]
pub struct LeadProductService {
    lead_repo: LeadRepository,
    product_repo: LeadProductRepository,
}

impl LeadProductService {
    pub fn new(lead_repo: LeadRepository, product_repo: LeadProductRepository) -> Self {
        Self {
            lead_repo,
            product_repo,
        }
    }

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<Vec<LeadProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = self.product_repo.list_active(executor, codlead, id_empresa).await?;
        tracing::info!(codlead, id_empresa, total = products.len(), "✅ Produtos do lead consultados");
        Ok(products)
    }

    /// Insere o item e recalcula o VALOR do lead na mesma transação.
    pub async fn add_product<'e, A>(
        &self,
        executor: A,
        codlead: i64,
        id_empresa: i64,
        payload: &AddLeadProductPayload,
    ) -> Result<LeadProduct, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let vlrtotal = validate_amounts(payload)?;

        let mut tx = executor.begin().await?;

        // 1. Trava o lead (serializa recálculos concorrentes)
        if !self.lead_repo.lock_active(&mut *tx, codlead, id_empresa).await? {
            return Err(AppError::NotFound(format!("Lead {codlead} não encontrado")));
        }

        // 2. Grava o item
        let product = self
            .product_repo
            .insert(&mut *tx, codlead, id_empresa, payload, vlrtotal)
            .await?;

        // 3. Recalcula o total
        let novo_valor = self.lead_repo.recompute_value(&mut *tx, codlead, id_empresa).await?;

        tx.commit().await?;

        tracing::info!(codlead, coditem = product.coditem, %novo_valor, "➕ Produto adicionado ao lead");
        Ok(product)
    }

    /// Inativa o item e devolve o novo VALOR do lead.
    pub async fn remove_product<'e, A>(
        &self,
        executor: A,
        coditem: i64,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<ProductRemoval, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if !self.lead_repo.lock_active(&mut *tx, codlead, id_empresa).await? {
            return Err(AppError::NotFound(format!("Lead {codlead} não encontrado")));
        }

        let affected = self
            .product_repo
            .deactivate(&mut *tx, coditem, codlead, id_empresa)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "Item {coditem} não encontrado no lead {codlead}"
            )));
        }

        let novo_valor_total = self.lead_repo.recompute_value(&mut *tx, codlead, id_empresa).await?;

        tx.commit().await?;

        tracing::info!(codlead, coditem, %novo_valor_total, "➖ Produto removido e valor atualizado");
        Ok(ProductRemoval { novo_valor_total })
    }
}

// Limites das colunas NUMERIC(15,4) (quantidade) e NUMERIC(15,2) (valores).
fn max_quantidade() -> Decimal {
    Decimal::new(100_000_000_000, 0)
}

fn max_valor() -> Decimal {
    Decimal::new(10_000_000_000_000, 0)
}

/// Valida quantidade e preços e devolve o VLRTOTAL da linha.
fn validate_amounts(payload: &AddLeadProductPayload) -> Result<Decimal, AppError> {
    if payload.quantidade <= Decimal::ZERO {
        return Err(AppError::BadRequest("QUANTIDADE deve ser maior que zero".to_string()));
    }
    if payload.quantidade >= max_quantidade() {
        return Err(AppError::BadRequest("QUANTIDADE acima do limite permitido".to_string()));
    }
    if payload.vlrunit < Decimal::ZERO {
        return Err(AppError::BadRequest("Valores não podem ser negativos".to_string()));
    }
    if payload.vlrunit >= max_valor() {
        return Err(AppError::BadRequest("VLRUNIT acima do limite permitido".to_string()));
    }

    let total = payload
        .line_total()
        .ok_or_else(|| AppError::BadRequest("VLRTOTAL acima do limite permitido".to_string()))?;
    if total < Decimal::ZERO {
        return Err(AppError::BadRequest("Valores não podem ser negativos".to_string()));
    }
    if total >= max_valor() {
        return Err(AppError::BadRequest("VLRTOTAL acima do limite permitido".to_string()));
    }
    Ok(total)
}
