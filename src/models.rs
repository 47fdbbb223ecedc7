pub mod erp;
pub mod ids;
pub mod lead;
pub mod lead_activity;
pub mod lead_product;
