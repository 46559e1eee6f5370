use async_trait::async_trait;

use super::partners_model::{NewPartner, Partner, PartnerFilter, PartnerUpdate};
use crate::{Page, Result};

#[async_trait]
pub trait PartnerRepositoryTrait: Send + Sync {
    async fn create(&self, new_partner: NewPartner) -> Result<Partner>;

    async fn update(&self, update: PartnerUpdate) -> Result<Partner>;

    /// Deletes the partner and detaches the benefits that reference it.
    async fn delete(&self, id: &str) -> Result<usize>;

    fn get_by_id(&self, id: &str) -> Result<Partner>;

    /// Case-insensitive exact name lookup.
    fn find_by_name(&self, name: &str) -> Result<Option<Partner>>;

    /// Ordered by name.
    fn search(&self, filter: &PartnerFilter) -> Result<Page<Partner>>;
}

#[async_trait]
pub trait PartnerServiceTrait: Send + Sync {
    async fn create_partner(&self, new_partner: NewPartner) -> Result<Partner>;

    async fn update_partner(&self, update: PartnerUpdate) -> Result<Partner>;

    async fn delete_partner(&self, id: &str) -> Result<()>;

    fn get_partner(&self, id: &str) -> Result<Partner>;

    fn search_partners(&self, filter: &PartnerFilter) -> Result<Page<Partner>>;
}
