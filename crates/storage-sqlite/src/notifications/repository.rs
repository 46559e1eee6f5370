use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use fintrack_core::notifications::{NewNotification, Notification, NotificationRepositoryTrait};
use fintrack_core::{Page, PageRequest, Result};

use super::model::NotificationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::notifications;

pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn create(&self, new_notification: NewNotification) -> Result<Notification> {
        new_notification.validate()?;
        self.writer
            .exec(move |conn| {
                let row: NotificationDB = new_notification.into();
                diesel::insert_into(notifications::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    /// Newest first.
    fn list(&self, unread_only: bool, page: PageRequest) -> Result<Page<Notification>> {
        let page = page.normalized();
        let mut conn = get_connection(&self.pool)?;

        let mut count_query = notifications::table.into_boxed();
        let mut query = notifications::table.into_boxed();
        if unread_only {
            count_query = count_query.filter(notifications::is_read.eq(false));
            query = query.filter(notifications::is_read.eq(false));
        }

        let total: i64 = count_query.count().get_result(&mut conn).into_core()?;
        let rows = query
            .select(NotificationDB::as_select())
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<NotificationDB>(&mut conn)
            .into_core()?;

        Ok(Page::new(
            rows.into_iter().map(Notification::from).collect(),
            total,
            page,
        ))
    }

    fn count_unread(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        notifications::table
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .into_core()
    }

    async fn mark_read(&self, id: &str) -> Result<Notification> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(notifications::table.find(&id))
                    .set(notifications::is_read.eq(true))
                    .execute(conn)
                    .into_core()?;
                let row = not_found_as(
                    notifications::table
                        .select(NotificationDB::as_select())
                        .find(&id)
                        .first::<NotificationDB>(conn),
                    || format!("Notification {}", id),
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn mark_all_read(&self) -> Result<usize> {
        self.writer
            .exec(|conn| {
                diesel::update(notifications::table.filter(notifications::is_read.eq(false)))
                    .set(notifications::is_read.eq(true))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(notifications::table.find(&id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
