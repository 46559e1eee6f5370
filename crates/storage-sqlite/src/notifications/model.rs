//! Database model for notifications.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::notifications::{NewNotification, Notification};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        Self {
            id: db.id,
            title: db.title,
            message: db.message,
            kind: db.kind.parse().unwrap_or_default(),
            link: db.link,
            is_read: db.is_read,
            created_at: db.created_at,
        }
    }
}

impl From<NewNotification> for NotificationDB {
    fn from(domain: NewNotification) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: domain.title.trim().to_string(),
            message: domain.message,
            kind: domain.kind.as_str().to_string(),
            link: domain.link,
            is_read: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
