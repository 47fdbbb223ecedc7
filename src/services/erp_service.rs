// src/services/erp_service.rs

use std::sync::Arc;

use reqwest::{Client, StatusCode};

use crate::{
    common::error::AppError,
    models::{
        erp::{DatasetSaveRequest, ServiceResponse},
        ids::record_id,
        lead_activity::{ActivityStatus, UpdateActivityRequest, UpdateActivityStatusRequest},
    },
    services::{
        dataset::{activity_patch_request, activity_status_request, ActivityPatch},
        token_provider::TokenProvider,
    },
};

/// Encaminha atualizações de atividades para o DatasetSP.save do Sankhya.
#[derive(Clone)]
pub struct ErpService {
    client: Client,
    save_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ErpService {
    pub fn new(client: Client, save_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            save_url: save_url.into(),
            tokens,
        }
    }

    pub async fn update_status(&self, request: UpdateActivityStatusRequest) -> Result<(), AppError> {
        let activity_id = record_id(request.codatividade.as_ref());
        let status = request.status.filter(|s| !s.trim().is_empty());

        let (Some(activity_id), Some(status)) = (activity_id, status) else {
            return Err(AppError::MissingFields(
                "CODATIVIDADE e STATUS são obrigatórios".to_string(),
            ));
        };
        let status: ActivityStatus = status.parse().map_err(AppError::BadRequest)?;

        tracing::info!(codatividade = %activity_id, status = status.as_str(), "🔄 Atualizando status da atividade no ERP");

        self.save(&activity_status_request(&activity_id, status)).await
    }

    pub async fn update_activity(&self, request: UpdateActivityRequest) -> Result<(), AppError> {
        let Some(activity_id) = record_id(request.codatividade.as_ref()) else {
            return Err(AppError::MissingFields("CODATIVIDADE é obrigatório".to_string()));
        };
        let patch = ActivityPatch::from_request(&request)?;
        let payload = activity_patch_request(&activity_id, &patch);

        tracing::info!(
            codatividade = %activity_id,
            fields = ?payload.request_body.fields,
            "🔄 Atualizando atividade no ERP"
        );

        self.save(&payload).await
    }

    // Um token recusado (401/403) é descartado e a chamada repetida uma única vez.
    async fn save(&self, payload: &DatasetSaveRequest) -> Result<(), AppError> {
        let token = self.tokens.get().await?;
        let mut response = self.post_dataset(&token, payload).await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::warn!(status = %response.status(), "🔑 Token recusado pelo ERP, renovando");
            self.tokens.invalidate().await;
            let token = self.tokens.get().await?;
            response = self.post_dataset(&token, payload).await?;
        }

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Erp(format!("ERP respondeu {status}: {text}")));
        }

        // O gateway devolve 200 com status "0" quando recusa o registro.
        if let Ok(body) = serde_json::from_str::<ServiceResponse>(&text) {
            if body.status.as_deref() == Some("0") {
                return Err(AppError::Erp(
                    body.status_message
                        .unwrap_or_else(|| "ERP recusou a operação".to_string()),
                ));
            }
        }

        tracing::info!("✅ ERP confirmou a gravação");
        Ok(())
    }

    async fn post_dataset(
        &self,
        token: &str,
        payload: &DatasetSaveRequest,
    ) -> Result<reqwest::Response, AppError> {
        Ok(self
            .client
            .post(&self.save_url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::token_provider::{ErpCredentials, SankhyaTokenCache};
    use crate::test_utils::{CountingTokens, FakeErp, LoginMode, SaveMode};
    use serde_json::{json, Value};

    fn service_for(erp: &FakeErp) -> ErpService {
        let client = Client::new();
        let tokens = SankhyaTokenCache::new(
            client.clone(),
            erp.login_url(),
            ErpCredentials::default(),
            None,
        );
        ErpService::new(client, erp.save_url(), Arc::new(tokens))
    }

    #[tokio::test]
    async fn status_update_forwards_pk_and_value() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let service = service_for(&erp);

        service
            .update_status(UpdateActivityStatusRequest {
                codatividade: Some(json!(1542)),
                status: Some("REALIZADO".into()),
            })
            .await
            .unwrap();

        let saves = erp.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].authorization.as_deref(), Some("Bearer tok-1"));
        assert_eq!(saves[0].body["requestBody"]["records"][0]["pk"]["CODATIVIDADE"], "1542");
        assert_eq!(saves[0].body["requestBody"]["records"][0]["values"]["0"], "REALIZADO");
        assert_eq!(saves[0].query.as_deref(), Some("serviceName=DatasetSP.save&outputType=json"));
    }

    #[tokio::test]
    async fn token_is_reused_across_calls() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let service = service_for(&erp);

        for status in ["AGUARDANDO", "ATRASADO", "REALIZADO"] {
            service
                .update_status(UpdateActivityStatusRequest {
                    codatividade: Some(json!("7")),
                    status: Some(status.into()),
                })
                .await
                .unwrap();
        }

        assert_eq!(erp.login_count(), 1);
        assert_eq!(erp.saves().len(), 3);
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_erp() {
        let tokens = Arc::new(CountingTokens::default());
        let service = ErpService::new(Client::new(), "http://127.0.0.1:9/nunca", tokens.clone());

        let err = service
            .update_status(UpdateActivityStatusRequest {
                codatividade: Some(json!(10)),
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingFields(_)));

        let err = service
            .update_activity(UpdateActivityRequest {
                titulo: Some("Sem id".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingFields(_)));

        assert_eq!(tokens.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_token_is_renewed_and_retried_once() {
        let erp = FakeErp::start_with(LoginMode::BearerToken, SaveMode::RejectFirstToken).await;
        let service = service_for(&erp);

        service
            .update_activity(UpdateActivityRequest {
                codatividade: Some(json!("33")),
                cor: Some("#111111".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let saves = erp.saves();
        assert_eq!(erp.login_count(), 2);
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[1].authorization.as_deref(), Some("Bearer tok-2"));
    }

    #[tokio::test]
    async fn erp_refusal_surfaces_its_message() {
        let erp = FakeErp::start_with(LoginMode::BearerToken, SaveMode::StatusZero).await;
        let service = service_for(&erp);

        let err = service
            .update_activity(UpdateActivityRequest {
                codatividade: Some(json!("33")),
                ativo: Some(crate::models::lead_activity::ActiveFlagInput::Bool(false)),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Erp(_)));
        assert_eq!(err.to_string(), "Registro bloqueado para edição");
    }

    #[tokio::test]
    async fn activity_update_sends_combined_description() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let service = service_for(&erp);

        service
            .update_activity(UpdateActivityRequest {
                codatividade: Some(json!(8)),
                titulo: Some("Visita técnica".into()),
                descricao: Some("Levar catálogo".into()),
                data_inicio: Some("2024-03-05T14:30:00".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let body = &erp.saves()[0].body;
        assert_eq!(
            body["requestBody"]["fields"],
            json!(["DESCRICAO", "DATA_INICIO"])
        );
        assert_eq!(
            body["requestBody"]["records"][0]["values"],
            json!({ "0": "Visita técnica|Levar catálogo", "1": "05/03/2024 14:30:00" })
        );
        assert_eq!(body["requestBody"]["standAlone"], Value::Bool(false));
    }
}
