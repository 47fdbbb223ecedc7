pub mod dataset;
pub mod erp_service;
pub mod lead_activity_service;
pub mod lead_product_service;
pub mod lead_service;
pub mod token_provider;
