//! Categories for grouping transactions.

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, find_category_by_name, get_all_categories,
    get_category, resolve_or_create_category,
};
pub use domain::{Category, CategoryId, CategoryName};
