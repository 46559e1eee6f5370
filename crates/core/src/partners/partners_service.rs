use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::partners_model::{NewPartner, Partner, PartnerFilter, PartnerUpdate};
use super::partners_traits::{PartnerRepositoryTrait, PartnerServiceTrait};
use crate::{Error, Page, Result};

pub struct PartnerService {
    repository: Arc<dyn PartnerRepositoryTrait>,
}

impl PartnerService {
    pub fn new(repository: Arc<dyn PartnerRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_name_free(&self, name: &str, partner_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_name(name.trim())? {
            Some(existing) if Some(existing.id.as_str()) != partner_id => {
                Err(Error::ConstraintViolation(format!(
                    "A partner named '{}' already exists",
                    existing.name
                )))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PartnerServiceTrait for PartnerService {
    async fn create_partner(&self, mut new_partner: NewPartner) -> Result<Partner> {
        new_partner.validate()?;
        new_partner.name = new_partner.name.trim().to_string();
        self.ensure_name_free(&new_partner.name, None)?;
        debug!("Creating partner '{}'", new_partner.name);
        self.repository.create(new_partner).await
    }

    async fn update_partner(&self, mut update: PartnerUpdate) -> Result<Partner> {
        update.validate()?;
        update.name = update.name.trim().to_string();
        self.ensure_name_free(&update.name, update.id.as_deref())?;
        self.repository.update(update).await
    }

    async fn delete_partner(&self, id: &str) -> Result<()> {
        match self.repository.delete(id).await? {
            0 => Err(Error::NotFound(format!("Partner {}", id))),
            _ => Ok(()),
        }
    }

    fn get_partner(&self, id: &str) -> Result<Partner> {
        self.repository.get_by_id(id)
    }

    fn search_partners(&self, filter: &PartnerFilter) -> Result<Page<Partner>> {
        self.repository.search(filter)
    }
}
