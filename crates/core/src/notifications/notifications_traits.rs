use async_trait::async_trait;

use super::notifications_model::{NewNotification, Notification};
use crate::{Page, PageRequest, Result};

#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    async fn create(&self, new_notification: NewNotification) -> Result<Notification>;

    /// Newest first.
    fn list(&self, unread_only: bool, page: PageRequest) -> Result<Page<Notification>>;

    fn count_unread(&self) -> Result<i64>;

    async fn mark_read(&self, id: &str) -> Result<Notification>;

    /// Returns the number of notifications that changed.
    async fn mark_all_read(&self) -> Result<usize>;

    async fn delete(&self, id: &str) -> Result<usize>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    async fn create_notification(&self, new_notification: NewNotification)
        -> Result<Notification>;

    fn list_notifications(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>>;

    fn unread_count(&self) -> Result<i64>;

    async fn mark_read(&self, id: &str) -> Result<Notification>;

    async fn mark_all_read(&self) -> Result<usize>;

    async fn delete_notification(&self, id: &str) -> Result<()>;
}
