//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the bridges live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

#[cfg(feature = "server")]
impl From<TypeConstraintError> for crate::services::ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        crate::services::ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::InvalidRecord(val.to_string())
    }
}
