//! Notifications module - in-app messages such as budget alerts.

mod notifications_model;
mod notifications_service;
mod notifications_traits;

#[cfg(test)]
mod notifications_service_tests;

pub use notifications_model::{
    NewNotification, Notification, NotificationFilter, NotificationKind,
};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
