// src/services/lead_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::{
        dates::{parse_display_date, to_display_date},
        error::AppError,
    },
    db::LeadRepository,
    models::lead::{Lead, SaveLeadPayload},
};

/// Resultado do upsert: o handler decide entre 201 e 200.
#[derive(Debug)]
pub enum SaveOutcome {
    Created(Lead),
    Updated(Lead),
}

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    /// Administradores (ou chamadas sem usuário) enxergam todos os leads da empresa.
    pub async fn list_leads<'e, E>(
        &self,
        executor: E,
        id_empresa: i64,
        codusuario: Option<i64>,
        is_admin: bool,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let owner_filter = if is_admin { None } else { codusuario };

        let leads = self.repo.list_active(executor, id_empresa, owner_filter).await?;
        tracing::info!(id_empresa, ?owner_filter, total = leads.len(), "✅ Leads consultados");
        Ok(leads)
    }

    pub async fn save_lead<'e, E>(
        &self,
        executor: E,
        id_empresa: i64,
        payload: &SaveLeadPayload,
        codusuario_criador: Option<i64>,
    ) -> Result<SaveOutcome, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data_vencimento = normalize_due_date(payload.data_vencimento.as_deref())?;

        match payload.codlead {
            Some(codlead) => {
                let lead = self
                    .repo
                    .update(executor, codlead, id_empresa, payload, data_vencimento.as_deref())
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Lead {codlead} não encontrado")))?;

                tracing::info!(codlead, id_empresa, "✅ Lead atualizado");
                Ok(SaveOutcome::Updated(lead))
            }
            None => {
                let lead = self
                    .repo
                    .insert(
                        executor,
                        id_empresa,
                        payload,
                        data_vencimento.as_deref(),
                        codusuario_criador,
                    )
                    .await?;

                tracing::info!(codlead = lead.codlead, id_empresa, "✅ Novo lead criado");
                Ok(SaveOutcome::Created(lead))
            }
        }
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
        let lead = self
            .repo
            .update_stage(executor, codlead, codestagio, id_empresa)
            .await?;

        match &lead {
            Some(_) => tracing::info!(codlead, codestagio, "✅ Estágio do lead atualizado"),
            None => tracing::warn!(codlead, id_empresa, "Lead não encontrado ao mudar estágio"),
        }
        Ok(lead)
    }

    pub async fn delete_lead<'e, E>(
        &self,
        executor: E,
        codlead: i64,
        id_empresa: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let affected = self.repo.soft_delete(executor, codlead, id_empresa).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("Lead {codlead} não encontrado")));
        }

        tracing::info!(codlead, id_empresa, "🗑️ Lead inativado");
        Ok(())
    }
}

/// `YYYY-MM-DD` vira `DD/MM/YYYY`; vazio vira `None`; o resultado precisa ser uma data real.
pub fn normalize_due_date(raw: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let display = to_display_date(raw);
    if parse_display_date(&display).is_none() {
        return Err(AppError::BadRequest(format!(
            "DATA_VENCIMENTO inválida: {raw}"
        )));
    }
    Ok(Some(display))
}
