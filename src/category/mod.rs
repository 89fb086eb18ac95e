//! Categories for classifying expenses, e.g. 'Supermercado', 'Luz'.

mod db;
mod domain;
mod endpoints;

pub use db::{
    category_exists, create_category, create_category_if_missing, create_category_table,
    get_all_categories,
};
pub use domain::{Category, CategoryForm, CategoryId, CategoryName};
pub use endpoints::{create_category_endpoint, get_categories_endpoint};
