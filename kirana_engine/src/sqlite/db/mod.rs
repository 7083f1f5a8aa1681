mod db;

pub mod order_items;
pub mod orders;
pub mod products;

pub use db::{db_url, new_pool, run_migrations};
