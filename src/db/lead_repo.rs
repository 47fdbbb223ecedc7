// src/db/lead_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadStatus, SaveLeadPayload},
};

pub const DEFAULT_TAG_COLOR: &str = "#3b82f6";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Leads ativos da empresa, mais recentes primeiro.
    /// `codusuario = None` devolve os leads de todos os usuários.
    pub async fn list_active<'e, E>(
        &self,
        executor: E,
        id_empresa: i64,
        codusuario: Option<i64>,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leads = sqlx::query_as!(
            Lead,
            r#"
            SELECT
                codlead, id_empresa, nome, descricao, valor, codestagio, codfunil,
                to_char(data_vencimento, 'DD/MM/YYYY') AS "data_vencimento?",
                tipo_tag, cor_tag, codparc, codusuario, ativo,
                to_char(data_criacao, 'DD/MM/YYYY') AS "data_criacao!",
                to_char(data_atualizacao, 'DD/MM/YYYY') AS "data_atualizacao!",
                status_lead AS "status_lead: LeadStatus", motivo_perda,
                to_char(data_conclusao, 'DD/MM/YYYY') AS "data_conclusao?"
            FROM ad_leads
            WHERE id_empresa = $1
              AND ativo = 'S'
              AND ($2::BIGINT IS NULL OR codusuario = $2)
            ORDER BY data_criacao DESC, codlead DESC
            "#,
            id_empresa,
            codusuario
        )
        .fetch_all(executor)
        .await?;

        Ok(leads)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as!(
            Lead,
            r#"
            SELECT
                codlead, id_empresa, nome, descricao, valor, codestagio, codfunil,
                to_char(data_vencimento, 'DD/MM/YYYY') AS "data_vencimento?",
                tipo_tag, cor_tag, codparc, codusuario, ativo,
                to_char(data_criacao, 'DD/MM/YYYY') AS "data_criacao!",
                to_char(data_atualizacao, 'DD/MM/YYYY') AS "data_atualizacao!",
                status_lead AS "status_lead: LeadStatus", motivo_perda,
                to_char(data_conclusao, 'DD/MM/YYYY') AS "data_conclusao?"
            FROM ad_leads
            WHERE codlead = $1 AND id_empresa = $2
            "#,
            codlead,
            id_empresa
        )
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    /// Cria o lead ativo, EM_ANDAMENTO. `data_vencimento` chega como DD/MM/YYYY.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        id_empresa: i64,
        payload: &SaveLeadPayload,
        data_vencimento: Option<&str>,
        codusuario: Option<i64>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as!(
            Lead,
            r#"
            INSERT INTO ad_leads (
                id_empresa, nome, descricao, valor, codestagio, codfunil,
                data_vencimento, tipo_tag, cor_tag, codparc, codusuario,
                ativo, status_lead
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                TO_DATE($7, 'DD/MM/YYYY'), $8, $9, $10, $11,
                'S', 'EM_ANDAMENTO'
            )
            RETURNING
                codlead, id_empresa, nome, descricao, valor, codestagio, codfunil,
                to_char(data_vencimento, 'DD/MM/YYYY') AS "data_vencimento?",
                tipo_tag, cor_tag, codparc, codusuario, ativo,
                to_char(data_criacao, 'DD/MM/YYYY') AS "data_criacao!",
                to_char(data_atualizacao, 'DD/MM/YYYY') AS "data_atualizacao!",
                status_lead AS "status_lead: LeadStatus", motivo_perda,
                to_char(data_conclusao, 'DD/MM/YYYY') AS "data_conclusao?"
            "#,
            id_empresa,
            payload.nome.as_str(),
            payload.descricao.as_deref(),
            payload.valor.unwrap_or(Decimal::ZERO),
            payload.codestagio.as_deref(),
            payload.codfunil.as_deref(),
            data_vencimento,
            payload.tipo_tag.as_deref(),
            payload.cor_tag.as_deref().unwrap_or(DEFAULT_TAG_COLOR),
            payload.codparc,
            codusuario
        )
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    /// Regrava os campos de negócio. `None` quando o lead não existe na empresa.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
        payload: &SaveLeadPayload,
        data_vencimento: Option<&str>,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as!(
            Lead,
            r#"
            UPDATE ad_leads
            SET nome = $1,
                descricao = $2,
                valor = $3,
                codestagio = $4,
                codfunil = $5,
                data_vencimento = TO_DATE($6, 'DD/MM/YYYY'),
                tipo_tag = $7,
                cor_tag = $8,
                codparc = $9,
                data_atualizacao = NOW()
            WHERE codlead = $10
              AND id_empresa = $11
            RETURNING
                codlead, id_empresa, nome, descricao, valor, codestagio, codfunil,
                to_char(data_vencimento, 'DD/MM/YYYY') AS "data_vencimento?",
                tipo_tag, cor_tag, codparc, codusuario, ativo,
                to_char(data_criacao, 'DD/MM/YYYY') AS "data_criacao!",
                to_char(data_atualizacao, 'DD/MM/YYYY') AS "data_atualizacao!",
                status_lead AS "status_lead: LeadStatus", motivo_perda,
                to_char(data_conclusao, 'DD/MM/YYYY') AS "data_conclusao?"
            "#,
            payload.nome.as_str(),
            payload.descricao.as_deref(),
            payload.valor.unwrap_or(Decimal::ZERO),
            payload.codestagio.as_deref(),
            payload.codfunil.as_deref(),
            data_vencimento,
            payload.tipo_tag.as_deref(),
            payload.cor_tag.as_deref().unwrap_or(DEFAULT_TAG_COLOR),
            payload.codparc,
            codlead,
            id_empresa
        )
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    pub async fn update_stage<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        codestagio: &str,
        id_empresa: i64,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as!(
            Lead,
            r#"
            UPDATE ad_leads
            SET codestagio = $1, data_atualizacao = NOW()
            WHERE codlead = $2
              AND id_empresa = $3
            RETURNING
                codlead, id_empresa, nome, descricao, valor, codestagio, codfunil,
                to_char(data_vencimento, 'DD/MM/YYYY') AS "data_vencimento?",
                tipo_tag, cor_tag, codparc, codusuario, ativo,
                to_char(data_criacao, 'DD/MM/YYYY') AS "data_criacao!",
                to_char(data_atualizacao, 'DD/MM/YYYY') AS "data_atualizacao!",
                status_lead AS "status_lead: LeadStatus", motivo_perda,
                to_char(data_conclusao, 'DD/MM/YYYY') AS "data_conclusao?"
            "#,
            codestagio,
            codlead,
            id_empresa
        )
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    /// Exclusão lógica. Retorna quantas linhas foram marcadas.
    pub async fn soft_delete<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query!(
            r#"
            UPDATE ad_leads
            SET ativo = 'N', data_atualizacao = NOW()
            WHERE codlead = $1
              AND id_empresa = $2
            "#,
            codlead,
            id_empresa
        )
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Trava a linha do lead até o fim da transação.
    pub async fn lock_active<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_scalar!(
            r#"
            SELECT codlead FROM ad_leads
            WHERE codlead = $1 AND id_empresa = $2 AND ativo = 'S'
            FOR UPDATE
            "#,
            codlead,
            id_empresa
        )
        .fetch_optional(executor)
        .await?;

        Ok(found.is_some())
    }

    /// VALOR = soma de VLRTOTAL dos itens ativos, num único comando.
    pub async fn recompute_value<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let valor = sqlx::query_scalar!(
            r#"
            UPDATE ad_leads
            SET valor = (
                    SELECT COALESCE(SUM(p.vlrtotal), 0)
                    FROM ad_leads_produtos p
                    WHERE p.codlead = $1
                      AND p.id_empresa = $2
                      AND p.ativo = 'S'
                ),
                data_atualizacao = NOW()
            WHERE codlead = $1
              AND id_empresa = $2
            RETURNING valor
            "#,
            codlead,
            id_empresa
        )
        .fetch_one(executor)
        .await?;

        Ok(valor)
    }
}
