pub mod auth;
pub mod error;
pub mod pagination;

pub use auth::{Identity, Role};
pub use error::ClientError;
pub use pagination::{ApiResponse, Paginated, Pagination};
