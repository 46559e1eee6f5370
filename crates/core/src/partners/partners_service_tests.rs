use super::*;
use crate::{Error, Page, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockPartnerRepository {
    partners: Mutex<Vec<Partner>>,
}

#[async_trait]
impl PartnerRepositoryTrait for MockPartnerRepository {
    async fn create(&self, new_partner: NewPartner) -> Result<Partner> {
        let mut partners = self.partners.lock().unwrap();
        let partner = Partner {
            id: format!("p{}", partners.len() + 1),
            name: new_partner.name,
            description: new_partner.description,
            website: new_partner.website,
            logo_url: new_partner.logo_url,
            category: new_partner.category,
            contact_email: new_partner.contact_email,
            is_active: new_partner.is_active,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        partners.push(partner.clone());
        Ok(partner)
    }

    async fn update(&self, update: PartnerUpdate) -> Result<Partner> {
        let id = update.id.unwrap_or_default();
        let mut partners = self.partners.lock().unwrap();
        let partner = partners
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Partner {}", id)))?;
        partner.name = update.name;
        Ok(partner.clone())
    }

    async fn delete(&self, _id: &str) -> Result<usize> {
        Ok(0)
    }

    fn get_by_id(&self, _id: &str) -> Result<Partner> {
        unimplemented!()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Partner>> {
        Ok(self
            .partners
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn search(&self, _filter: &PartnerFilter) -> Result<Page<Partner>> {
        unimplemented!()
    }
}

fn partner(name: &str) -> NewPartner {
    NewPartner {
        id: None,
        name: name.to_string(),
        description: None,
        website: Some("https://example.org".to_string()),
        logo_url: None,
        category: Some("travel".to_string()),
        contact_email: Some("hello@example.org".to_string()),
        is_active: true,
    }
}

#[tokio::test]
async fn test_names_are_unique_ignoring_case() {
    let service = PartnerService::new(Arc::new(MockPartnerRepository::default()));
    let acme = service.create_partner(partner("Acme")).await.unwrap();
    service.create_partner(partner("Globex")).await.unwrap();

    assert!(matches!(
        service.create_partner(partner(" ACME ")).await,
        Err(Error::ConstraintViolation(_))
    ));

    let mut rename = PartnerUpdate {
        id: Some(acme.id.clone()),
        name: "acme".to_string(),
        description: None,
        website: None,
        logo_url: None,
        category: None,
        contact_email: None,
        is_active: true,
    };
    assert!(service.update_partner(rename.clone()).await.is_ok());

    rename.name = "globex".to_string();
    assert!(matches!(
        service.update_partner(rename).await,
        Err(Error::ConstraintViolation(_))
    ));
}

#[test]
fn test_contact_details_validation() {
    assert!(partner("Acme").validate().is_ok());

    let mut bad_site = partner("Acme");
    bad_site.website = Some("ftp://example.org".to_string());
    assert!(bad_site.validate().is_err());

    let mut bare_scheme = partner("Acme");
    bare_scheme.website = Some("https://".to_string());
    assert!(bare_scheme.validate().is_err());

    let mut bad_email = partner("Acme");
    bad_email.contact_email = Some("nobody".to_string());
    assert!(bad_email.validate().is_err());

    assert!(partner("  ").validate().is_err());
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let service = PartnerService::new(Arc::new(MockPartnerRepository::default()));
    assert!(service.delete_partner("p9").await.unwrap_err().is_not_found());
}
