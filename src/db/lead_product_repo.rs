// src/db/lead_product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::lead_product::{AddLeadProductPayload, LeadProduct},
};

#[derive(Clone)]
pub struct LeadProductRepository {
    pool: PgPool,
}

impl LeadProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<Vec<LeadProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as!(
            LeadProduct,
            r#"
            SELECT
                coditem, codlead, id_empresa, codprod, descrprod,
                quantidade, vlrunit, vlrtotal, ativo,
                to_char(data_inclusao, 'DD/MM/YYYY') AS "data_inclusao!"
            FROM ad_leads_produtos
            WHERE codlead = $1
              AND id_empresa = $2
              AND ativo = 'S'
            ORDER BY coditem ASC
            "#,
            codlead,
            id_empresa
        )
        .fetch_all(executor)
        .await?;

        Ok(products)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
        payload: &AddLeadProductPayload,
        vlrtotal: Decimal,
    ) -> Result<LeadProduct, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as!(
            LeadProduct,
            r#"
            INSERT INTO ad_leads_produtos (
                codlead, id_empresa, codprod, descrprod, quantidade, vlrunit, vlrtotal, ativo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'S')
            RETURNING
                coditem, codlead, id_empresa, codprod, descrprod,
                quantidade, vlrunit, vlrtotal, ativo,
                to_char(data_inclusao, 'DD/MM/YYYY') AS "data_inclusao!"
            "#,
            codlead,
            id_empresa,
            payload.codprod,
            payload.descrprod.as_str(),
            payload.quantidade,
            payload.vlrunit,
            vlrtotal
        )
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    /// Inativa o item. Retorna quantas linhas foram marcadas.
    pub async fn deactivate<'e, E>(
        &self,
        executor: E,
        coditem: i64,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query!(
            r#"
            UPDATE ad_leads_produtos
            SET ativo = 'N'
            WHERE coditem = $1
              AND codlead = $2
              AND id_empresa = $3
              AND ativo = 'S'
            "#,
            coditem,
            codlead,
            id_empresa
        )
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
