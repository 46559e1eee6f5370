use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::notifications_model::{NewNotification, Notification};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::{Error, Page, PageRequest, Result};

pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification> {
        new_notification.validate()?;
        debug!(
            "Creating {} notification '{}'",
            new_notification.kind, new_notification.title
        );
        self.repository.create(new_notification).await
    }

    fn list_notifications(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>> {
        self.repository.list(unread_only, page.normalized())
    }

    fn unread_count(&self) -> Result<i64> {
        self.repository.count_unread()
    }

    async fn mark_read(&self, id: &str) -> Result<Notification> {
        self.repository.mark_read(id).await
    }

    async fn mark_all_read(&self) -> Result<usize> {
        self.repository.mark_all_read().await
    }

    async fn delete_notification(&self, id: &str) -> Result<()> {
        match self.repository.delete(id).await? {
            0 => Err(Error::NotFound(format!("Notification {}", id))),
            _ => Ok(()),
        }
    }
}
