pub mod auth;
pub mod response;
pub mod validate;

pub use auth::AuthUser;
pub use response::{ApiResponse, ApiResult};
pub use validate::{ResourceId, ValidJson, ValidQuery};
