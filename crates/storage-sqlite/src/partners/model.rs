//! Database model for partners.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::partners::{NewPartner, Partner, PartnerUpdate};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::partners)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct PartnerDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PartnerDB> for Partner {
    fn from(db: PartnerDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            website: db.website,
            logo_url: db.logo_url,
            category: db.category,
            contact_email: db.contact_email,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewPartner> for PartnerDB {
    fn from(domain: NewPartner) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name,
            description: domain.description,
            website: domain.website,
            logo_url: domain.logo_url,
            category: domain.category,
            contact_email: domain.contact_email,
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<PartnerUpdate> for PartnerDB {
    fn from(domain: PartnerUpdate) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            name: domain.name,
            description: domain.description,
            website: domain.website,
            logo_url: domain.logo_url,
            category: domain.category,
            contact_email: domain.contact_email,
            is_active: domain.is_active,
            created_at: NaiveDateTime::default(), // kept from the existing record
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
