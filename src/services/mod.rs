//! Application services orchestrating domain logic and side effects.
pub mod drafts;
pub mod internships;
pub mod tracker;

use crate::forms::main::FieldErrors;
use crate::gateway::GatewayError;

/// Convenience alias for service results.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("user may not post internships")]
    Unauthorized,
    #[error("invalid form input")]
    Validation(FieldErrors),
    #[error("a submission is already in progress")]
    AlreadyPending,
    #[error("backend rejected the internship")]
    Rejected(#[source] GatewayError),
    #[error("failed to reach the internship backend")]
    Gateway(#[source] GatewayError),
}
