// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::save_lead,
        handlers::leads::update_stage,
        handlers::leads::delete_lead,

        // --- Produtos ---
        handlers::lead_products::list_products,
        handlers::lead_products::add_product,
        handlers::lead_products::remove_product,

        // --- Atividades ---
        handlers::lead_activities::list_activities,
        handlers::lead_activities::create_activity,
        handlers::lead_activities::update_activity_status,
        handlers::lead_activities::update_activity,
    ),
    components(
        schemas(
            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::SaveLeadPayload,
            models::lead::UpdateStagePayload,

            // --- Produtos ---
            models::lead_product::LeadProduct,
            models::lead_product::AddLeadProductPayload,
            models::lead_product::ProductRemoval,

            // --- Atividades ---
            models::lead_activity::ActivityKind,
            models::lead_activity::ActivityStatus,
            models::lead_activity::LeadActivity,
            models::lead_activity::CreateActivityPayload,
            models::lead_activity::UpdateActivityStatusRequest,
            models::lead_activity::UpdateActivityRequest,
        )
    ),
    tags(
        (name = "Leads", description = "Funil de Vendas (AD_LEADS)"),
        (name = "Produtos do Lead", description = "Itens do Lead e Recálculo do VALOR"),
        (name = "Atividades", description = "Agenda de Atividades e Gravação no ERP")
    ),
    modifiers(&TenantHeaderAddon)
)]
pub struct ApiDoc;

struct TenantHeaderAddon;

impl utoipa::Modify for TenantHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "tenant_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-tenant-id"))),
        );
    }
}
