use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use super::tiers_model::{
    compute_membership_status, Benefit, BenefitUpdate, MembershipStatus, MembershipTier,
    NewBenefit, TierUpsert,
};
use super::tiers_traits::{TierRepositoryTrait, TierServiceTrait};
use crate::accounts::AccountServiceTrait;
use crate::transactions::{TransactionKind, TransactionRepositoryTrait};
use crate::utils::{fiscal_year_of, fiscal_year_range, DateRange};
use crate::{Error, Result};

pub struct TierService {
    repository: Arc<dyn TierRepositoryTrait>,
    account_service: Arc<dyn AccountServiceTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    fiscal_year_start_month: u32,
    upsert_timeout: Duration,
}

impl TierService {
    pub fn new(
        repository: Arc<dyn TierRepositoryTrait>,
        account_service: Arc<dyn AccountServiceTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        fiscal_year_start_month: u32,
        upsert_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            account_service,
            transaction_repository,
            fiscal_year_start_month,
            upsert_timeout,
        }
    }

    fn ensure_benefits_exist(&self, benefit_ids: &[String]) -> Result<()> {
        for id in benefit_ids {
            self.repository.get_benefit(id).map_err(|e| {
                if e.is_not_found() {
                    Error::invalid_input(format!("Benefit {} does not exist", id))
                } else {
                    e
                }
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl TierServiceTrait for TierService {
    async fn upsert_tier(&self, tier: TierUpsert) -> Result<MembershipTier> {
        tier.validate()?;
        if let Some(id) = tier.id.as_deref() {
            self.repository.get_by_id(id)?;
        }

        let existing = self.repository.list()?;
        if let Some((other, range)) = tier.find_overlap(&existing) {
            warn!(
                "Rejecting tier '{}': {} range overlaps tier '{}'",
                tier.name, range, other.name
            );
            return Err(Error::ConstraintViolation(format!(
                "The {} range of '{}' overlaps tier '{}'",
                range, tier.name, other.name
            )));
        }
        self.ensure_benefits_exist(&tier.benefit_ids)?;

        debug!(
            "Upserting tier '{}' with {} benefits",
            tier.name,
            tier.benefit_ids.len()
        );
        self.repository.upsert(tier, self.upsert_timeout).await
    }

    async fn delete_tier(&self, id: &str) -> Result<()> {
        match self.repository.delete(id).await? {
            0 => Err(Error::NotFound(format!("Tier {}", id))),
            _ => Ok(()),
        }
    }

    fn get_tier(&self, id: &str) -> Result<MembershipTier> {
        self.repository.get_by_id(id)
    }

    fn list_tiers(&self) -> Result<Vec<MembershipTier>> {
        self.repository.list()
    }

    fn list_benefits(&self) -> Result<Vec<Benefit>> {
        self.repository.list_benefits()
    }

    async fn create_benefit(&self, new_benefit: NewBenefit) -> Result<Benefit> {
        new_benefit.validate()?;
        self.repository.create_benefit(new_benefit).await
    }

    async fn update_benefit(&self, update: BenefitUpdate) -> Result<Benefit> {
        update.validate()?;
        self.repository.update_benefit(update).await
    }

    async fn delete_benefit(&self, id: &str) -> Result<()> {
        match self.repository.delete_benefit(id).await? {
            0 => Err(Error::NotFound(format!("Benefit {}", id))),
            _ => Ok(()),
        }
    }

    fn get_membership_status(&self, as_of: NaiveDate) -> Result<MembershipStatus> {
        let fiscal_year = fiscal_year_of(as_of, self.fiscal_year_start_month)?;
        let year = fiscal_year_range(fiscal_year, self.fiscal_year_start_month)?;
        let to_date = DateRange {
            start: year.start,
            end: as_of.succ_opt().unwrap_or(year.end).min(year.end),
        };

        let spend: Decimal = self
            .transaction_repository
            .list_in_range(&to_date, Some(TransactionKind::Expense))?
            .iter()
            .map(|t| t.amount)
            .sum();
        let balance = self.account_service.total_active_balance()?;

        let tiers = self.repository.list()?;
        Ok(compute_membership_status(
            &tiers,
            as_of,
            fiscal_year,
            spend,
            balance,
        ))
    }
}
