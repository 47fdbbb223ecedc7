// src/services/lead_activity_service.rs

use chrono::{Local, NaiveDate, NaiveDateTime};
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::{dates::parse_local_timestamp, error::AppError},
    db::{lead_activity_repo::NewActivity, LeadActivityRepository, LeadRepository},
    models::lead_activity::{ActivityStatus, CreateActivityPayload, LeadActivity},
};

#[derive(Clone)]
pub struct LeadActivityService {
    lead_repo: LeadRepository,
    activity_repo: LeadActivityRepository,
}

impl LeadActivityService {
    pub fn new(lead_repo: LeadRepository, activity_repo: LeadActivityRepository) -> Self {
        Self {
            lead_repo,
            activity_repo,
        }
    }

    pub async fn list_activities<'e, E>(
        &self,
        executor: E,
        codlead: Option<i64>,
        id_empresa: i64,
        ativo: Option<&str>,
    ) -> Result<Vec<LeadActivity>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ativo = match ativo.map(|a| a.trim().to_uppercase()) {
            None => "S".to_string(),
            Some(flag) if flag == "S" || flag == "N" => flag,
            Some(other) => {
                return Err(AppError::BadRequest(format!("ativo inválido: {other}")));
            }
        };

        let activities = self
            .activity_repo
            .list(executor, codlead, id_empresa, &ativo)
            .await?;

        tracing::info!(?codlead, id_empresa, total = activities.len(), "✅ Atividades consultadas");
        Ok(activities)
    }

    pub async fn create_activity<'e, A>(
        &self,
        executor: A,
        id_empresa: i64,
        payload: &CreateActivityPayload,
        codusuario_padrao: Option<i64>,
    ) -> Result<LeadActivity, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let now = Local::now().naive_local();
        let data_inicio = parse_optional_timestamp("DATA_INICIO", payload.data_inicio.as_deref())?
            .unwrap_or(now);
        let data_fim = parse_optional_timestamp("DATA_FIM", payload.data_fim.as_deref())?
            .unwrap_or(data_inicio);

        let status = initial_status(data_inicio.date(), now.date());

        let mut tx = executor.begin().await?;

        if let Some(codlead) = payload.codlead {
            if self
                .lead_repo
                .find_by_id(&mut *tx, codlead, id_empresa)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound(format!("Lead {codlead} não encontrado")));
            }
        }

        // ORDEM = MAX + 1 sob o lock da empresa, para não repetir no mesmo escopo.
        self.activity_repo.lock_tenant_scope(&mut *tx, id_empresa).await?;
        let ordem = self
            .activity_repo
            .next_order(&mut *tx, payload.codlead, id_empresa)
            .await?;

        let new_activity = NewActivity {
            codlead: payload.codlead,
            tipo: payload.tipo,
            descricao: payload.descricao.as_deref(),
            data_inicio,
            data_fim,
            codusuario: payload.codusuario.or(codusuario_padrao),
            dados_complementares: payload.dados_complementares.as_deref(),
            cor: payload.cor.as_deref(),
            ordem,
            status,
        };

        let created = self
            .activity_repo
            .insert(&mut *tx, id_empresa, &new_activity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            codatividade = created.codatividade,
            ordem,
            status = status.as_str(),
            "➕ Atividade criada"
        );
        Ok(created)
    }
}

/// Status de nascimento: início (só a data) antes de hoje = ATRASADO, senão AGUARDANDO.
pub fn initial_status(start: NaiveDate, today: NaiveDate) -> ActivityStatus {
    if start < today {
        ActivityStatus::Atrasado
    } else {
        ActivityStatus::Aguardando
    }
}

fn parse_optional_timestamp(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_local_timestamp(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("{field} inválida: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::SaveLeadPayload;
    use crate::models::lead_activity::ActivityKind;
    use crate::services::lead_service::{LeadService, SaveOutcome};
    use crate::test_utils::{test_pool, unique_tenant};
    use chrono::{Duration, NaiveTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn past_start_is_overdue() {
        assert_eq!(initial_status(day(2024, 3, 4), day(2024, 3, 5)), ActivityStatus::Atrasado);
    }

    #[test]
    fn today_or_later_is_pending() {
        assert_eq!(initial_status(day(2024, 3, 5), day(2024, 3, 5)), ActivityStatus::Aguardando);
        assert_eq!(initial_status(day(2024, 3, 6), day(2024, 3, 5)), ActivityStatus::Aguardando);
    }

    #[test]
    fn creation_never_marks_done() {
        let today = day(2024, 3, 5);
        for offset in -3..=3 {
            let start = today + Duration::days(offset);
            assert_ne!(initial_status(start, today), ActivityStatus::Realizado);
        }
    }

    #[test]
    fn blank_timestamps_are_absent_and_garbage_is_rejected() {
        assert_eq!(parse_optional_timestamp("DATA_INICIO", Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_timestamp("DATA_INICIO", Some("2024-03-05T08:00:00")).unwrap(),
            Some(day(2024, 3, 5).and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
        );
        assert!(matches!(
            parse_optional_timestamp("DATA_FIM", Some("amanhã cedo")),
            Err(AppError::BadRequest(_))
        ));
    }

    fn activity(codlead: Option<i64>, data_inicio: Option<String>) -> CreateActivityPayload {
        CreateActivityPayload {
            codlead,
            tipo: ActivityKind::Ligacao,
            descricao: Some("Retornar contato".into()),
            data_inicio,
            data_fim: None,
            codusuario: None,
            dados_complementares: None,
            cor: Some("#22c55e".into()),
        }
    }

    #[tokio::test]
    async fn orders_and_statuses_against_postgres() {
        let Some(pool) = test_pool().await else { return };
        let lead_repo = LeadRepository::new(pool.clone());
        let service = LeadActivityService::new(
            lead_repo.clone(),
            LeadActivityRepository::new(pool.clone()),
        );
        let empresa = unique_tenant();

        let SaveOutcome::Created(lead) = LeadService::new(lead_repo)
            .save_lead(
                &pool,
                empresa,
                &SaveLeadPayload {
                    nome: "Oficina Norte".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap()
        else {
            panic!("esperava criação");
        };

        let yesterday = (Local::now() - Duration::days(1)).format("%Y-%m-%dT10:00:00").to_string();
        let tomorrow = (Local::now() + Duration::days(1)).format("%Y-%m-%dT10:00:00").to_string();

        let late = service
            .create_activity(&pool, empresa, &activity(Some(lead.codlead), Some(yesterday)), Some(5))
            .await
            .unwrap();
        let pending = service
            .create_activity(&pool, empresa, &activity(Some(lead.codlead), Some(tomorrow)), Some(5))
            .await
            .unwrap();

        assert_eq!(late.status, ActivityStatus::Atrasado);
        assert_eq!(late.ordem, 1);
        assert_eq!(late.codusuario, Some(5));
        assert_eq!(pending.status, ActivityStatus::Aguardando);
        assert_eq!(pending.ordem, 2);
        assert_eq!(pending.data_inicio, pending.data_fim);

        let listed = service
            .list_activities(&pool, Some(lead.codlead), empresa, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].codatividade, pending.codatividade);

        let loose = service
            .create_activity(&pool, empresa, &activity(None, None), None)
            .await
            .unwrap();
        assert_eq!(loose.codlead, None);
        assert_eq!(loose.ordem, 3);
        assert_eq!(loose.status, ActivityStatus::Aguardando);

        let inactive = service
            .list_activities(&pool, None, empresa, Some("N"))
            .await
            .unwrap();
        assert!(inactive.is_empty());
    }
}
