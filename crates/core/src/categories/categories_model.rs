//! Category domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Whether a category classifies money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "INCOME",
            CategoryKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(CategoryKind::Income),
            "EXPENSE" => Ok(CategoryKind::Expense),
            other => Err(Error::invalid_input(format!(
                "Unknown category kind '{}'",
                other
            ))),
        }
    }
}

/// Domain model for a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub kind: CategoryKind,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn is_parent(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == CategoryKind::Expense
    }
}

/// Input model for creating a category.
///
/// `kind` may be omitted for sub-categories, which inherit it from their
/// parent. `sort_order` is assigned by the service when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub parent_id: Option<String>,
    pub kind: Option<CategoryKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        validate_name_and_color(&self.name, self.color.as_deref())
    }
}

/// Input model for updating a category. Kind and parent are fixed after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::invalid_input("Category ID is required for updates"));
        }
        validate_name_and_color(&self.name, self.color.as_deref())
    }
}

fn validate_name_and_color(name: &str, color: Option<&str>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Category name cannot be empty"));
    }
    if let Some(color) = color {
        let hex = color.strip_prefix('#').unwrap_or("");
        if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_input(format!(
                "Invalid color '{}', expected #RGB or #RRGGBB",
                color
            )));
        }
    }
    Ok(())
}

/// Category with its children (for hierarchical display)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithChildren {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
}

/// Rows that still point at a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    pub transactions: i64,
    pub budget_lines: i64,
}

impl CategoryUsage {
    pub fn is_unused(&self) -> bool {
        self.transactions == 0 && self.budget_lines == 0
    }
}

/// Groups a flat list into top-level categories with their children, both
/// ordered by `sort_order` then name.
pub fn organize_hierarchically(mut categories: Vec<Category>) -> Vec<CategoryWithChildren> {
    categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
    let (parents, children): (Vec<Category>, Vec<Category>) =
        categories.into_iter().partition(Category::is_parent);

    parents
        .into_iter()
        .map(|parent| {
            let children = children
                .iter()
                .filter(|c| c.parent_id.as_ref() == Some(&parent.id))
                .cloned()
                .collect();
            CategoryWithChildren {
                category: parent,
                children,
            }
        })
        .collect()
}
