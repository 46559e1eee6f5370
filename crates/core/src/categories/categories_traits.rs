use async_trait::async_trait;

use super::categories_model::{
    Category, CategoryKind, CategoryUpdate, CategoryUsage, CategoryWithChildren, NewCategory,
};
use crate::errors::Result;

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// Categories of the given kind, or all of them.
    fn list(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>>;

    fn get_by_id(&self, id: &str) -> Result<Category>;

    fn get_children(&self, parent_id: &str) -> Result<Vec<Category>>;

    /// Counts transactions and budget lines assigned to the category.
    fn get_usage(&self, category_id: &str) -> Result<CategoryUsage>;

    /// Inserts a category. `sort_order` is always set by the caller.
    async fn create(&self, new_category: NewCategory) -> Result<Category>;

    async fn update(&self, update: CategoryUpdate) -> Result<Category>;

    /// Deletes a category in a single transaction.
    ///
    /// With a replacement, transactions are re-pointed to it and budget
    /// lines are merged into the replacement's line of the same budget.
    /// Children are re-parented to the deleted category's parent either way.
    /// Returns the number of reassigned transactions.
    async fn delete(&self, id: &str, replacement_id: Option<String>) -> Result<usize>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn list_categories(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>>;

    /// Top-level categories with their children.
    fn get_category_tree(&self, kind: Option<CategoryKind>) -> Result<Vec<CategoryWithChildren>>;

    fn get_category(&self, id: &str) -> Result<Category>;

    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;

    async fn update_category(&self, update: CategoryUpdate) -> Result<Category>;

    /// Deletes a category, optionally moving its transactions and budget
    /// lines to `replacement_id`. Returns the number of reassigned
    /// transactions.
    async fn delete_category(&self, id: &str, replacement_id: Option<String>) -> Result<usize>;
}
