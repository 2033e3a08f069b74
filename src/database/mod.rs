pub mod manager;
pub mod models;
pub mod repository;
pub mod schema;

pub use manager::{connect, connect_lazy, health_check, DatabaseError};
pub use repository::{
    CustomerRepository, Page, PostRepository, ProductRepository, SaleRepository, UserRepository,
};
