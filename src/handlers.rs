// src/handlers.rs

pub mod lead_activities;
pub mod lead_products;
pub mod leads;
