pub mod tenancy;
pub mod user;
