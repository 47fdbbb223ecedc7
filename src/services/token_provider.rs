// src/services/token_provider.rs

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tokio::sync::Mutex;

use crate::{common::error::AppError, models::erp::LoginResponse};

pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Fonte do bearer token usado nas chamadas ao ERP.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Devolve o token em cache ou faz login para obter um novo.
    async fn get(&self) -> Result<String, AppError>;

    /// Descarta o token em cache; o próximo `get` faz login de novo.
    async fn invalidate(&self);
}

// As quatro credenciais estáticas enviadas como cabeçalho no login.
#[derive(Clone, Default)]
pub struct ErpCredentials {
    pub token: String,
    pub app_key: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ErpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErpCredentials")
            .field("username", &self.username)
            .field("token", &"***")
            .field("app_key", &"***")
            .field("password", &"***")
            .finish()
    }
}

struct CachedToken {
    value: String,
    obtained_at: Instant,
}

/// Cache de um único token do Sankhya, compartilhado por todas as requisições.
pub struct SankhyaTokenCache {
    client: Client,
    login_url: String,
    credentials: ErpCredentials,
    ttl: Option<Duration>,
    cached: Mutex<Option<CachedToken>>,
}

impl SankhyaTokenCache {
    pub fn new(
        client: Client,
        login_url: impl Into<String>,
        credentials: ErpCredentials,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            client,
            login_url: login_url.into(),
            credentials,
            ttl,
            cached: Mutex::new(None),
        }
    }

    async fn login(&self) -> Result<String, AppError> {
        tracing::info!(url = %self.login_url, "🔑 Autenticando no ERP");

        let response = self
            .client
            .post(&self.login_url)
            .header("token", &self.credentials.token)
            .header("appkey", &self.credentials.app_key)
            .header("username", &self.credentials.username)
            .header("password", &self.credentials.password)
            .json(&json!({}))
            .timeout(LOGIN_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body: LoginResponse = response.json().await?;

        body.into_token().ok_or_else(|| {
            AppError::Authentication("Token não encontrado na resposta de login.".to_string())
        })
    }

    fn is_fresh(&self, cached: &CachedToken) -> bool {
        self.ttl
            .map_or(true, |ttl| cached.obtained_at.elapsed() < ttl)
    }
}

#[async_trait]
impl TokenProvider for SankhyaTokenCache {
    async fn get(&self) -> Result<String, AppError> {
        // O lock fica retido durante o login: requisições concorrentes esperam o mesmo token.
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| self.is_fresh(t)) {
            return Ok(token.value.clone());
        }

        let value = self.login().await?;
        tracing::info!("✅ Token do ERP obtido e armazenado em cache");

        *cached = Some(CachedToken {
            value: value.clone(),
            obtained_at: Instant::now(),
        });
        Ok(value)
    }

    async fn invalidate(&self) {
        if self.cached.lock().await.take().is_some() {
            tracing::info!("🗑️ Token do ERP descartado do cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeErp, LoginMode};

    fn cache_for(erp: &FakeErp, ttl: Option<Duration>) -> SankhyaTokenCache {
        SankhyaTokenCache::new(
            Client::new(),
            erp.login_url(),
            ErpCredentials {
                token: "tk".into(),
                app_key: "ak".into(),
                username: "vendas@empresa.com".into(),
                password: "segredo".into(),
            },
            ttl,
        )
    }

    #[tokio::test]
    async fn reuses_token_without_logging_in_again() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let cache = cache_for(&erp, None);

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();
        let third = cache.get().await.unwrap();

        assert_eq!(first, "tok-1");
        assert_eq!(second, first);
        assert_eq!(third, first);
        assert_eq!(erp.login_count(), 1);
    }

    #[tokio::test]
    async fn sends_the_four_credential_headers() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        cache_for(&erp, None).get().await.unwrap();

        let headers = erp.last_login_headers().unwrap();
        assert_eq!(headers.get("token").map(String::as_str), Some("tk"));
        assert_eq!(headers.get("appkey").map(String::as_str), Some("ak"));
        assert_eq!(
            headers.get("username").map(String::as_str),
            Some("vendas@empresa.com")
        );
        assert_eq!(headers.get("password").map(String::as_str), Some("segredo"));
    }

    #[tokio::test]
    async fn accepts_the_fallback_token_field() {
        let erp = FakeErp::start(LoginMode::FallbackToken).await;
        assert_eq!(cache_for(&erp, None).get().await.unwrap(), "tok-1");
    }

    #[tokio::test]
    async fn missing_token_is_an_authentication_error() {
        let erp = FakeErp::start(LoginMode::NoToken).await;
        let err = cache_for(&erp, None).get().await.unwrap_err();

        assert!(matches!(err, AppError::Authentication(_)));
        assert_eq!(err.to_string(), "Token não encontrado na resposta de login.");
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_login() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let cache = cache_for(&erp, None);

        assert_eq!(cache.get().await.unwrap(), "tok-1");
        cache.invalidate().await;
        assert_eq!(cache.get().await.unwrap(), "tok-2");
        assert_eq!(erp.login_count(), 2);
    }

    #[tokio::test]
    async fn expired_tokens_are_renewed() {
        let erp = FakeErp::start(LoginMode::BearerToken).await;
        let cache = cache_for(&erp, Some(Duration::ZERO));

        cache.get().await.unwrap();
        cache.get().await.unwrap();
        assert_eq!(erp.login_count(), 2);
    }
}
