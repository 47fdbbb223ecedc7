// src/db/lead_activity_repo.rs

use chrono::NaiveDateTime;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::lead_activity::{ActivityKind, ActivityStatus, LeadActivity},
};

// Valores já resolvidos pelo serviço (ordem, status, datas).
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub codlead: Option<i64>,
    pub tipo: ActivityKind,
    pub descricao: Option<&'a str>,
    pub data_inicio: NaiveDateTime,
    pub data_fim: NaiveDateTime,
    pub codusuario: Option<i64>,
    pub dados_complementares: Option<&'a str>,
    pub cor: Option<&'a str>,
    pub ordem: i64,
    pub status: ActivityStatus,
}

#[derive(Clone)]
pub struct LeadActivityRepository {
    pool: PgPool,
}

impl LeadActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atividades da empresa (ou só de um lead), ORDEM mais alta primeiro.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        codlead: Option<i64>,
        id_empresa: i64,
        ativo: &str,
    ) -> Result<Vec<LeadActivity>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let activities = sqlx::query_as!(
            LeadActivity,
            r#"
            SELECT
                codatividade, codlead, id_empresa,
                tipo AS "tipo: ActivityKind", descricao,
                to_char(data_hora, 'DD/MM/YYYY HH24:MI:SS') AS "data_hora!",
                to_char(data_inicio, 'DD/MM/YYYY HH24:MI:SS') AS "data_inicio!",
                to_char(data_fim, 'DD/MM/YYYY HH24:MI:SS') AS "data_fim!",
                codusuario, dados_complementares, cor, ordem, ativo,
                status AS "status: ActivityStatus"
            FROM ad_leads_atividades
            WHERE id_empresa = $1
              AND ativo = $2
              AND ($3::BIGINT IS NULL OR codlead = $3)
            ORDER BY ordem DESC, codatividade DESC
            "#,
            id_empresa,
            ativo,
            codlead
        )
        .fetch_all(executor)
        .await?;

        Ok(activities)
    }

    /// Serializa as criações de atividades da empresa até o fim da transação.
    pub async fn lock_tenant_scope<'e, E>(&self, executor: E, id_empresa: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // pg_advisory_xact_lock devolve void; no FROM a linha sai sem coluna tipada.
        sqlx::query!("SELECT 1 AS locked FROM pg_advisory_xact_lock($1)", id_empresa)
            .fetch_all(executor)
            .await?;
        Ok(())
    }

    /// MAX(ORDEM) + 1 no escopo do lead, ou da empresa inteira sem lead.
    pub async fn next_order<'e, E>(
        &self,
        executor: E,
        codlead: Option<i64>,
        id_empresa: i64,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let next = sqlx::query_scalar!(
            r#"
            SELECT COALESCE(MAX(ordem), 0) + 1 AS "next!"
            FROM ad_leads_atividades
            WHERE id_empresa = $1
              AND ($2::BIGINT IS NULL OR codlead = $2)
            "#,
            id_empresa,
            codlead
        )
        .fetch_one(executor)
        .await?;

        Ok(next)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        id_empresa: i64,
        activity: &NewActivity<'_>,
    ) -> Result<LeadActivity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as!(
            LeadActivity,
            r#"
            INSERT INTO ad_leads_atividades (
                codlead, id_empresa, tipo, descricao, data_inicio, data_fim,
                codusuario, dados_complementares, cor, ordem, ativo, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'S', $11)
            RETURNING
                codatividade, codlead, id_empresa,
                tipo AS "tipo: ActivityKind", descricao,
                to_char(data_hora, 'DD/MM/YYYY HH24:MI:SS') AS "data_hora!",
                to_char(data_inicio, 'DD/MM/YYYY HH24:MI:SS') AS "data_inicio!",
                to_char(data_fim, 'DD/MM/YYYY HH24:MI:SS') AS "data_fim!",
                codusuario, dados_complementares, cor, ordem, ativo,
                status AS "status: ActivityStatus"
            "#,
            activity.codlead,
            id_empresa,
            activity.tipo as ActivityKind,
            activity.descricao,
            activity.data_inicio,
            activity.data_fim,
            activity.codusuario,
            activity.dados_complementares,
            activity.cor,
            activity.ordem,
            activity.status as ActivityStatus
        )
        .fetch_one(executor)
        .await?;

        Ok(created)
    }
}
