// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{LeadActivityRepository, LeadProductRepository, LeadRepository},
    services::{
        erp_service::ErpService,
        lead_activity_service::LeadActivityService,
        lead_product_service::LeadProductService,
        lead_service::LeadService,
        token_provider::{ErpCredentials, SankhyaTokenCache},
    },
};

pub const DEFAULT_LOGIN_URL: &str = "https://api.sandbox.sankhya.com.br/login";
pub const DEFAULT_SAVE_URL: &str = "https://api.sandbox.sankhya.com.br/gateway/v1/mge/service.sbr?serviceName=DatasetSP.save&outputType=json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct ErpConfig {
    pub login_url: String,
    pub save_url: String,
    pub credentials: ErpCredentials,
    pub token_ttl: Option<Duration>,
}

impl ErpConfig {
    /// Credenciais ausentes viram string vazia: o erro aparece no login, não na subida.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();

        let token_ttl = env::var("SANKHYA_TOKEN_TTL_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            login_url: env::var("SANKHYA_LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string()),
            save_url: env::var("SANKHYA_SAVE_URL").unwrap_or_else(|_| DEFAULT_SAVE_URL.to_string()),
            credentials: ErpCredentials {
                token: var("SANKHYA_TOKEN"),
                app_key: var("SANKHYA_APPKEY"),
                username: var("SANKHYA_USERNAME"),
                password: var("SANKHYA_PASSWORD"),
            },
            token_ttl,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub lead_service: LeadService,
    pub lead_product_service: LeadProductService,
    pub lead_activity_service: LeadActivityService,
    pub erp_service: ErpService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let erp_config = ErpConfig::from_env();
        tracing::info!(login_url = %erp_config.login_url, ttl = ?erp_config.token_ttl, "ERP configurado");

        let http_client = reqwest::Client::builder()
            .build()
            .context("Falha ao criar o cliente HTTP")?;

        let tokens = SankhyaTokenCache::new(
            http_client.clone(),
            erp_config.login_url,
            erp_config.credentials,
            erp_config.token_ttl,
        );
        let erp_service = ErpService::new(http_client, erp_config.save_url, Arc::new(tokens));

        Ok(Self::from_parts(db_pool, erp_service))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(db_pool: PgPool, erp_service: ErpService) -> Self {
        let lead_repo = LeadRepository::new(db_pool.clone());
        let product_repo = LeadProductRepository::new(db_pool.clone());
        let activity_repo = LeadActivityRepository::new(db_pool.clone());

        Self {
            lead_service: LeadService::new(lead_repo.clone()),
            lead_product_service: LeadProductService::new(lead_repo.clone(), product_repo),
            lead_activity_service: LeadActivityService::new(lead_repo, activity_repo),
            erp_service,
            db_pool,
        }
    }
}
