use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

use super::categories_model::{
    organize_hierarchically, Category, CategoryKind, CategoryUpdate, CategoryWithChildren,
    NewCategory,
};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Looks up a category referenced from the request body, reporting a
    /// missing one as invalid input rather than a 404.
    fn get_referenced(&self, id: &str, role: &str) -> Result<Category> {
        self.repository.get_by_id(id).map_err(|e| {
            if e.is_not_found() {
                Error::invalid_input(format!("{} category {} does not exist", role, id))
            } else {
                e
            }
        })
    }

    fn next_sort_order(&self, parent_id: Option<&str>, kind: CategoryKind) -> Result<i32> {
        let siblings = match parent_id {
            Some(pid) => self.repository.get_children(pid)?,
            None => self
                .repository
                .list(Some(kind))?
                .into_iter()
                .filter(Category::is_parent)
                .collect(),
        };
        Ok(siblings.iter().map(|c| c.sort_order).max().unwrap_or(0) + 1)
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn list_categories(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>> {
        self.repository.list(kind)
    }

    fn get_category_tree(&self, kind: Option<CategoryKind>) -> Result<Vec<CategoryWithChildren>> {
        Ok(organize_hierarchically(self.repository.list(kind)?))
    }

    fn get_category(&self, id: &str) -> Result<Category> {
        self.repository.get_by_id(id)
    }

    async fn create_category(&self, mut new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;

        let kind = match new_category.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = self.get_referenced(parent_id, "Parent")?;
                if !parent.is_parent() {
                    return Err(Error::invalid_input(
                        "Sub-categories cannot have sub-categories of their own",
                    ));
                }
                match new_category.kind {
                    Some(kind) if kind != parent.kind => {
                        return Err(Error::invalid_input(format!(
                            "A {} category cannot be nested under the {} category '{}'",
                            kind, parent.kind, parent.name
                        )));
                    }
                    _ => parent.kind,
                }
            }
            None => new_category.kind.unwrap_or_default(),
        };
        new_category.kind = Some(kind);

        if new_category.sort_order.is_none() {
            new_category.sort_order =
                Some(self.next_sort_order(new_category.parent_id.as_deref(), kind)?);
        }

        debug!("Creating {} category '{}'", kind, new_category.name);
        self.repository.create(new_category).await
    }

    async fn update_category(&self, update: CategoryUpdate) -> Result<Category> {
        update.validate()?;
        self.repository.update(update).await
    }

    async fn delete_category(&self, id: &str, replacement_id: Option<String>) -> Result<usize> {
        let category = self.repository.get_by_id(id)?;

        match replacement_id.as_deref() {
            Some(replacement_id) => {
                if replacement_id == id {
                    return Err(Error::invalid_input(
                        "A category cannot be replaced by itself",
                    ));
                }
                let replacement = self.get_referenced(replacement_id, "Replacement")?;
                if replacement.parent_id.as_deref() == Some(id) {
                    return Err(Error::invalid_input(
                        "A category cannot be replaced by one of its own sub-categories",
                    ));
                }
                if replacement.kind != category.kind {
                    return Err(Error::invalid_input(format!(
                        "Replacement category '{}' is {} but '{}' is {}",
                        replacement.name, replacement.kind, category.name, category.kind
                    )));
                }
            }
            None => {
                let usage = self.repository.get_usage(id)?;
                if !usage.is_unused() {
                    warn!(
                        "Refusing to delete category {}: {} transactions, {} budget lines",
                        id, usage.transactions, usage.budget_lines
                    );
                    return Err(Error::ConstraintViolation(format!(
                        "Category '{}' is used by {} transactions and {} budget lines; \
                         choose a replacement category",
                        category.name, usage.transactions, usage.budget_lines
                    )));
                }
            }
        }

        let reassigned = self.repository.delete(id, replacement_id).await?;
        debug!(
            "Deleted category {} ({} transactions reassigned)",
            id, reassigned
        );
        Ok(reassigned)
    }
}
