use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, PageRequest, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    #[default]
    Info,
    Warning,
    BudgetAlert,
    TierChange,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "INFO",
            NotificationKind::Warning => "WARNING",
            NotificationKind::BudgetAlert => "BUDGET_ALERT",
            NotificationKind::TierChange => "TIER_CHANGE",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INFO" => Ok(NotificationKind::Info),
            "WARNING" => Ok(NotificationKind::Warning),
            "BUDGET_ALERT" => Ok(NotificationKind::BudgetAlert),
            "TIER_CHANGE" => Ok(NotificationKind::TierChange),
            other => Err(Error::invalid_input(format!(
                "Unknown notification kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Optional in-app route the notification points at.
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_input("Notification title cannot be empty"));
        }
        if self.message.trim().is_empty() {
            return Err(Error::invalid_input("Notification message cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl NotificationFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_parts(self.page, self.page_size)
    }
}
