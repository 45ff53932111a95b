pub mod errors;
pub mod matches;

pub use errors::{ServiceError, ServiceResult};
