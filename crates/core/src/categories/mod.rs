//! Categories module - income/expense classification with one level of nesting.

mod categories_model;
mod categories_service;
mod categories_traits;


pub use categories_model::{
    organize_hierarchically, Category, CategoryKind, CategoryUpdate, CategoryUsage,
    CategoryWithChildren, NewCategory,
};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
