use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::sync::Arc;

use fintrack_core::partners::{
    NewPartner, Partner, PartnerFilter, PartnerRepositoryTrait, PartnerUpdate,
};
use fintrack_core::{Page, Result};

use super::model::PartnerDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::{benefits, partners, transactions};
use crate::utils::{contains_pattern, LIKE_ESCAPE};

pub struct PartnerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PartnerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_partner(conn: &mut SqliteConnection, id: &str) -> Result<PartnerDB> {
    not_found_as(
        partners::table
            .select(PartnerDB::as_select())
            .find(id)
            .first::<PartnerDB>(conn),
        || format!("Partner {}", id),
    )
}

fn filtered<'a>(filter: &'a PartnerFilter) -> partners::BoxedQuery<'a, Sqlite> {
    let mut query = partners::table.into_boxed();
    if let Some(search) = filter.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            let pattern = contains_pattern(search);
            query = query.filter(
                partners::name
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(partners::description.like(pattern).escape(LIKE_ESCAPE)),
            );
        }
    }
    if let Some(category) = filter.category.as_deref() {
        query = query.filter(partners::category.eq(category));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(partners::is_active.eq(active));
    }
    query
}

#[async_trait]
impl PartnerRepositoryTrait for PartnerRepository {
    async fn create(&self, new_partner: NewPartner) -> Result<Partner> {
        new_partner.validate()?;
        self.writer
            .exec(move |conn| {
                let row: PartnerDB = new_partner.into();
                diesel::insert_into(partners::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, update: PartnerUpdate) -> Result<Partner> {
        update.validate()?;
        self.writer
            .exec(move |conn| {
                let mut row: PartnerDB = update.into();
                row.created_at = load_partner(conn, &row.id)?.created_at;
                diesel::update(partners::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    /// Deletes the partner, detaching the benefits and transactions that
    /// point at it.
    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(benefits::table.filter(benefits::partner_id.eq(&id)))
                    .set(benefits::partner_id.eq(None::<String>))
                    .execute(conn)
                    .into_core()?;
                diesel::update(transactions::table.filter(transactions::partner_id.eq(&id)))
                    .set(transactions::partner_id.eq(None::<String>))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(partners::table.find(&id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Partner> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_partner(&mut conn, id)?.into())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Partner>> {
        let mut conn = get_connection(&self.pool)?;
        // The name column is declared COLLATE NOCASE.
        let row = partners::table
            .filter(partners::name.eq(name.trim()))
            .select(PartnerDB::as_select())
            .first::<PartnerDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Partner::from))
    }

    fn search(&self, filter: &PartnerFilter) -> Result<Page<Partner>> {
        let request = filter.page_request();
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .into_core()?;
        let rows = filtered(filter)
            .select(PartnerDB::as_select())
            .order(partners::name.asc())
            .limit(request.limit())
            .offset(request.offset())
            .load::<PartnerDB>(&mut conn)
            .into_core()?;

        Ok(Page::new(
            rows.into_iter().map(Partner::from).collect(),
            total,
            request,
        ))
    }
}
