pub mod customer;
pub mod post;
pub mod product;
pub mod sale;
pub mod user;

pub use customer::Customer;
pub use post::Post;
pub use product::Product;
pub use sale::{Sale, SaleDetail};
pub use user::{User, UserCredentials};
