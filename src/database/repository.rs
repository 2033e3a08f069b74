// Per-table repositories. Each method issues the statements for exactly one
// API operation and returns rows already shaped for serialization.

use serde::Serialize;

pub mod customers;
pub mod posts;
pub mod products;
pub mod sales;
pub mod users;

pub use customers::CustomerRepository;
pub use posts::PostRepository;
pub use products::ProductRepository;
pub use sales::{SaleFilter, SaleRepository};
pub use users::UserRepository;

/// One window of a listing plus the size of the whole filtered set
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub skip: i64,
    pub take: i64,
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total: i64, skip: i64, take: i64, list: Vec<T>) -> Self {
        Self { total, skip, take, list }
    }
}
