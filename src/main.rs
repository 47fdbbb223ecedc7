//src/main.rs

use std::env;

use anyhow::Context;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_utils;

use crate::config::{AppState, DEFAULT_BIND_ADDR};
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .context("Falha ao inicializar o estado da aplicação.")?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    // Rotas estáticas (/atividades) têm prioridade sobre /{codlead}
    let lead_routes = Router::new()
        .route("/api/leads"
               ,get(handlers::leads::list_leads)
               .post(handlers::leads::save_lead)
        )
        .route("/api/leads/{codlead}"
               ,delete(handlers::leads::delete_lead)
        )
        .route("/api/leads/{codlead}/estagio"
               ,patch(handlers::leads::update_stage)
        );

    let product_routes = Router::new()
        .route("/api/leads/{codlead}/produtos"
               ,get(handlers::lead_products::list_products)
               .post(handlers::lead_products::add_product)
        )
        .route("/api/leads/{codlead}/produtos/{coditem}"
               ,delete(handlers::lead_products::remove_product)
        );

    let activity_routes = Router::new()
        .route("/api/leads/atividades"
               ,get(handlers::lead_activities::list_activities)
               .post(handlers::lead_activities::create_activity)
        )
        .route("/api/leads/atividades/atualizar-status"
               ,post(handlers::lead_activities::update_activity_status)
        )
        .route("/api/leads/atividades/atualizar"
               ,post(handlers::lead_activities::update_activity)
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(lead_routes)
        .merge(product_routes)
        .merge(activity_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
