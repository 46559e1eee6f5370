//! SQLite storage implementation for partners.

mod model;
mod repository;

pub use model::PartnerDB;
pub use repository::PartnerRepository;
