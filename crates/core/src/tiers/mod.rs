//! Membership tiers module - spend/balance bands, their benefits and the
//! member's current standing.

mod tiers_model;
mod tiers_service;
mod tiers_traits;


pub use tiers_model::{
    compute_membership_status, ranges_overlap, Benefit, BenefitUpdate, MembershipStatus,
    MembershipTier, NewBenefit, TierUpsert,
};
pub use tiers_service::TierService;
pub use tiers_traits::{TierRepositoryTrait, TierServiceTrait};
