//! Database model for categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::categories::{Category, NewCategory};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CategoryDB {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub kind: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            parent_id: db.parent_id,
            kind: db.kind.parse().unwrap_or_default(),
            color: db.color,
            icon: db.icon,
            sort_order: db.sort_order,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewCategory> for CategoryDB {
    fn from(domain: NewCategory) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name.trim().to_string(),
            parent_id: domain.parent_id,
            kind: domain.kind.unwrap_or_default().as_str().to_string(),
            color: domain.color,
            icon: domain.icon,
            sort_order: domain.sort_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }
}
