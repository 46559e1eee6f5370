//! Partners module - organisations that provide membership benefits.

mod partners_model;
mod partners_service;
mod partners_traits;

#[cfg(test)]
mod partners_service_tests;

pub use partners_model::{NewPartner, Partner, PartnerFilter, PartnerUpdate};
pub use partners_service::PartnerService;
pub use partners_traits::{PartnerRepositoryTrait, PartnerServiceTrait};
