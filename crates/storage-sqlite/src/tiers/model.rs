//! Database models for membership tiers, benefits and their links.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::tiers::{Benefit, MembershipTier, NewBenefit, TierUpsert};
use fintrack_core::utils::{parse_decimal_or_zero, parse_optional_decimal};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::membership_tiers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct MembershipTierDB {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub min_spend: String,
    pub max_spend: Option<String>,
    pub min_balance: String,
    pub max_balance: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MembershipTierDB {
    /// Builds the row for an upsert. `created_at` is replaced with the stored
    /// value when the tier already exists.
    pub fn from_upsert(id: String, tier: &TierUpsert) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name: tier.name.trim().to_string(),
            color: tier.color.clone(),
            min_spend: tier.min_spend.to_string(),
            max_spend: tier.max_spend.map(|v| v.to_string()),
            min_balance: tier.min_balance.to_string(),
            max_balance: tier.max_balance.map(|v| v.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_domain(self, benefits: Vec<Benefit>) -> MembershipTier {
        MembershipTier {
            id: self.id,
            name: self.name,
            color: self.color,
            min_spend: parse_decimal_or_zero(&self.min_spend),
            max_spend: parse_optional_decimal(self.max_spend.as_deref()),
            min_balance: parse_decimal_or_zero(&self.min_balance),
            max_balance: parse_optional_decimal(self.max_balance.as_deref()),
            benefits,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::benefits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BenefitDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub partner_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BenefitDB> for Benefit {
    fn from(db: BenefitDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            partner_id: db.partner_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewBenefit> for BenefitDB {
    fn from(domain: NewBenefit) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name.trim().to_string(),
            description: domain.description,
            partner_id: domain.partner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::tier_benefits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TierBenefitDB {
    pub tier_id: String,
    pub benefit_id: String,
}
