pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ErrorObject, ErrorReason, ErrorResponse};
pub use routes::create_api_router;
