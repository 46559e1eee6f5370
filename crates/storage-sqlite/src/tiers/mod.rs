//! SQLite storage implementation for membership tiers and benefits.

mod model;
mod repository;

pub use model::{BenefitDB, MembershipTierDB, TierBenefitDB};
pub use repository::TierRepository;
