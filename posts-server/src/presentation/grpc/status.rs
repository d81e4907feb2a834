use tonic::Status;
use tracing::error;

use crate::domain::error::DomainError;

pub(crate) fn map_domain_error(err: DomainError) -> Status {
    match err {
        DomainError::Validation { .. } => Status::invalid_argument(err.to_string()),
        DomainError::NotFound(_) => Status::not_found(err.to_string()),
        DomainError::Conflict(_) => Status::failed_precondition(err.to_string()),
        DomainError::Forbidden => Status::permission_denied(err.to_string()),
        DomainError::Unavailable(_) => Status::unavailable("dependency unavailable"),
        DomainError::Unexpected(detail) => {
            error!(%detail, "grpc request failed");
            Status::internal("internal error")
        }
    }
}
