use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, PageRequest, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
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

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewPartner {
    pub fn validate(&self) -> Result<()> {
        validate_partner(
            &self.name,
            self.website.as_deref(),
            self.logo_url.as_deref(),
            self.contact_email.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerUpdate {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
}

impl PartnerUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::invalid_input("Partner ID is required for updates"));
        }
        validate_partner(
            &self.name,
            self.website.as_deref(),
            self.logo_url.as_deref(),
            self.contact_email.as_deref(),
        )
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    rest.is_some_and(|host| !host.is_empty())
}

fn validate_partner(
    name: &str,
    website: Option<&str>,
    logo_url: Option<&str>,
    contact_email: Option<&str>,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Partner name cannot be empty"));
    }
    for (label, url) in [("Website", website), ("Logo URL", logo_url)] {
        if let Some(url) = url.filter(|u| !is_http_url(u)) {
            return Err(Error::invalid_input(format!(
                "{} must start with http:// or https://, got '{}'",
                label, url
            )));
        }
    }
    if let Some(email) = contact_email {
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid {
            return Err(Error::invalid_input(format!(
                "Invalid contact email '{}'",
                email
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerFilter {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PartnerFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_parts(self.page, self.page_size)
    }
}
