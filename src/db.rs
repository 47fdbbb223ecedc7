pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod lead_product_repo;
pub use lead_product_repo::LeadProductRepository;
pub mod lead_activity_repo;
pub use lead_activity_repo::LeadActivityRepository;
