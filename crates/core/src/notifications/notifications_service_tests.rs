use super::*;
use crate::{Error, Page, PageRequest, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockNotificationRepository {
    items: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepositoryTrait for MockNotificationRepository {
    async fn create(&self, new_notification: NewNotification) -> Result<Notification> {
        let mut items = self.items.lock().unwrap();
        let notification = Notification {
            id: format!("n{}", items.len() + 1),
            title: new_notification.title,
            message: new_notification.message,
            kind: new_notification.kind,
            link: new_notification.link,
            is_read: false,
            created_at: NaiveDateTime::default(),
        };
        items.insert(0, notification.clone());
        Ok(notification)
    }

    fn list(&self, unread_only: bool, page: PageRequest) -> Result<Page<Notification>> {
        let matching: Vec<_> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(data, total, page))
    }

    fn count_unread(&self) -> Result<i64> {
        Ok(self.items.lock().unwrap().iter().filter(|n| !n.is_read).count() as i64)
    }

    async fn mark_read(&self, id: &str) -> Result<Notification> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("Notification {}", id)))?;
        item.is_read = true;
        Ok(item.clone())
    }

    async fn mark_all_read(&self) -> Result<usize> {
        let mut changed = 0;
        for item in self.items.lock().unwrap().iter_mut().filter(|n| !n.is_read) {
            item.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|n| n.id != id);
        Ok(before - items.len())
    }
}

fn note(title: &str) -> NewNotification {
    NewNotification {
        title: title.to_string(),
        message: "body".to_string(),
        kind: NotificationKind::Info,
        link: None,
    }
}

#[tokio::test]
async fn test_unread_lifecycle() {
    let service = NotificationService::new(Arc::new(MockNotificationRepository::default()));
    for title in ["a", "b", "c"] {
        service.create_notification(note(title)).await.unwrap();
    }
    assert_eq!(service.unread_count().unwrap(), 3);

    service.mark_read("n2").await.unwrap();
    assert_eq!(service.unread_count().unwrap(), 2);
    let unread = service
        .list_notifications(true, PageRequest::default())
        .unwrap();
    assert_eq!(unread.total, 2);

    assert_eq!(service.mark_all_read().await.unwrap(), 2);
    assert_eq!(service.unread_count().unwrap(), 0);
}

#[tokio::test]
async fn test_create_requires_title() {
    let service = NotificationService::new(Arc::new(MockNotificationRepository::default()));
    let result = service.create_notification(note("  ")).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let service = NotificationService::new(Arc::new(MockNotificationRepository::default()));
    assert!(service.delete_notification("nope").await.unwrap_err().is_not_found());
}

#[test]
fn test_kind_wire_format() {
    let json = serde_json::to_string(&NotificationKind::BudgetAlert).unwrap();
    assert_eq!(json, "\"BUDGET_ALERT\"");
    assert_eq!(
        "TIER_CHANGE".parse::<NotificationKind>().unwrap(),
        NotificationKind::TierChange
    );
}
