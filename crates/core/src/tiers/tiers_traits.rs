use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use super::tiers_model::{
    Benefit, BenefitUpdate, MembershipStatus, MembershipTier, NewBenefit, TierUpsert,
};
use crate::errors::Result;

#[async_trait]
pub trait TierRepositoryTrait: Send + Sync {
    /// All tiers with their benefits, ordered by `min_spend`.
    fn list(&self) -> Result<Vec<MembershipTier>>;

    fn get_by_id(&self, id: &str) -> Result<MembershipTier>;

    /// Writes the tier row and replaces all of its benefit links in a single
    /// transaction. Nothing is persisted if any statement fails or the
    /// transaction does not commit within `timeout`.
    async fn upsert(&self, tier: TierUpsert, timeout: Duration) -> Result<MembershipTier>;

    async fn delete(&self, id: &str) -> Result<usize>;

    fn list_benefits(&self) -> Result<Vec<Benefit>>;

    fn get_benefit(&self, id: &str) -> Result<Benefit>;

    async fn create_benefit(&self, new_benefit: NewBenefit) -> Result<Benefit>;

    async fn update_benefit(&self, update: BenefitUpdate) -> Result<Benefit>;

    /// Deletes the benefit and its tier links.
    async fn delete_benefit(&self, id: &str) -> Result<usize>;
}

#[async_trait]
pub trait TierServiceTrait: Send + Sync {
    async fn upsert_tier(&self, tier: TierUpsert) -> Result<MembershipTier>;

    async fn delete_tier(&self, id: &str) -> Result<()>;

    fn get_tier(&self, id: &str) -> Result<MembershipTier>;

    fn list_tiers(&self) -> Result<Vec<MembershipTier>>;

    fn list_benefits(&self) -> Result<Vec<Benefit>>;

    async fn create_benefit(&self, new_benefit: NewBenefit) -> Result<Benefit>;

    async fn update_benefit(&self, update: BenefitUpdate) -> Result<Benefit>;

    async fn delete_benefit(&self, id: &str) -> Result<()>;

    /// Membership standing on `as_of`, from the fiscal-year spend up to and
    /// including that date and the current active balance.
    fn get_membership_status(&self, as_of: NaiveDate) -> Result<MembershipStatus>;
}
