use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use fintrack_core::tiers::{
    Benefit, BenefitUpdate, MembershipTier, NewBenefit, TierRepositoryTrait, TierUpsert,
};
use fintrack_core::{Error, Result};

use super::model::{BenefitDB, MembershipTierDB, TierBenefitDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::{benefits, membership_tiers, tier_benefits};

pub struct TierRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TierRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Loads the benefits linked to each of `tier_ids`, keyed by tier id.
fn benefits_by_tier(
    conn: &mut SqliteConnection,
    tier_ids: &[String],
) -> Result<HashMap<String, Vec<Benefit>>> {
    let links: Vec<(String, BenefitDB)> = tier_benefits::table
        .inner_join(benefits::table)
        .filter(tier_benefits::tier_id.eq_any(tier_ids))
        .select((tier_benefits::tier_id, BenefitDB::as_select()))
        .order(benefits::name.asc())
        .load(conn)
        .into_core()?;

    let mut grouped: HashMap<String, Vec<Benefit>> = HashMap::new();
    for (tier_id, benefit) in links {
        grouped.entry(tier_id).or_default().push(benefit.into());
    }
    Ok(grouped)
}

fn load_tier(conn: &mut SqliteConnection, id: &str) -> Result<MembershipTier> {
    let row = not_found_as(
        membership_tiers::table
            .select(MembershipTierDB::as_select())
            .find(id)
            .first::<MembershipTierDB>(conn),
        || format!("Membership tier {}", id),
    )?;
    let mut benefits = benefits_by_tier(conn, &[row.id.clone()])?;
    let linked = benefits.remove(&row.id).unwrap_or_default();
    Ok(row.into_domain(linked))
}

fn load_benefit(conn: &mut SqliteConnection, id: &str) -> Result<BenefitDB> {
    not_found_as(
        benefits::table
            .select(BenefitDB::as_select())
            .find(id)
            .first::<BenefitDB>(conn),
        || format!("Benefit {}", id),
    )
}

#[async_trait]
impl TierRepositoryTrait for TierRepository {
    /// Tiers ordered by `min_spend`.
    fn list(&self) -> Result<Vec<MembershipTier>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = membership_tiers::table
            .select(MembershipTierDB::as_select())
            .load::<MembershipTierDB>(&mut conn)
            .into_core()?;
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut benefits = benefits_by_tier(&mut conn, &ids)?;

        let mut tiers: Vec<MembershipTier> = rows
            .into_iter()
            .map(|row| {
                let linked = benefits.remove(&row.id).unwrap_or_default();
                row.into_domain(linked)
            })
            .collect();
        // Amounts are stored as text, so the ordering happens here.
        tiers.sort_by(|a, b| {
            a.min_spend
                .cmp(&b.min_spend)
                .then_with(|| a.min_balance.cmp(&b.min_balance))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(tiers)
    }

    fn get_by_id(&self, id: &str) -> Result<MembershipTier> {
        let mut conn = get_connection(&self.pool)?;
        load_tier(&mut conn, id)
    }

    async fn upsert(&self, tier: TierUpsert, timeout: Duration) -> Result<MembershipTier> {
        tier.validate()?;

        self.writer
            .exec_with_timeout(timeout, move |conn| {
                let id = tier
                    .id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                let mut row = MembershipTierDB::from_upsert(id.clone(), &tier);

                let existing_created_at = membership_tiers::table
                    .find(&id)
                    .select(membership_tiers::created_at)
                    .first::<chrono::NaiveDateTime>(conn)
                    .optional()
                    .into_core()?;

                match existing_created_at {
                    Some(created_at) => {
                        row.created_at = created_at;
                        diesel::update(membership_tiers::table.find(&id))
                            .set(&row)
                            .execute(conn)
                            .into_core()?;
                    }
                    None => {
                        diesel::insert_into(membership_tiers::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                    }
                }

                diesel::delete(tier_benefits::table.filter(tier_benefits::tier_id.eq(&id)))
                    .execute(conn)
                    .into_core()?;
                let links: Vec<TierBenefitDB> = tier
                    .benefit_ids
                    .iter()
                    .map(|benefit_id| TierBenefitDB {
                        tier_id: id.clone(),
                        benefit_id: benefit_id.clone(),
                    })
                    .collect();
                if !links.is_empty() {
                    diesel::insert_into(tier_benefits::table)
                        .values(&links)
                        .execute(conn)
                        .into_core()?;
                }

                debug!("Stored tier {} with {} benefits", id, links.len());
                load_tier(conn, &id)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(tier_benefits::table.filter(tier_benefits::tier_id.eq(&id)))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(membership_tiers::table.find(&id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn list_benefits(&self) -> Result<Vec<Benefit>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = benefits::table
            .select(BenefitDB::as_select())
            .order(benefits::name.asc())
            .load::<BenefitDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Benefit::from).collect())
    }

    fn get_benefit(&self, id: &str) -> Result<Benefit> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_benefit(&mut conn, id)?.into())
    }

    async fn create_benefit(&self, new_benefit: NewBenefit) -> Result<Benefit> {
        new_benefit.validate()?;
        self.writer
            .exec(move |conn| {
                let row: BenefitDB = new_benefit.into();
                diesel::insert_into(benefits::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update_benefit(&self, update: BenefitUpdate) -> Result<Benefit> {
        update.validate()?;
        let id = update
            .id
            .clone()
            .ok_or_else(|| Error::invalid_input("Benefit ID is required for updates"))?;

        self.writer
            .exec(move |conn| {
                let mut row = load_benefit(conn, &id)?;
                row.name = update.name.trim().to_string();
                row.description = update.description;
                row.partner_id = update.partner_id;
                row.updated_at = chrono::Utc::now().naive_utc();
                diesel::update(benefits::table.find(&id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_benefit(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(tier_benefits::table.filter(tier_benefits::benefit_id.eq(&id)))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(benefits::table.find(&id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
