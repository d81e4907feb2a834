use std::time::Duration;

use thiserror::Error;
use tonic::Code;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("grpc status error: {0}")]
    Status(#[from] tonic::Status),

    #[error("grpc transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("{service} call exceeded deadline of {deadline:?}")]
    Timeout {
        service: &'static str,
        deadline: Duration,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ClientError> for DomainError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Timeout { .. } => DomainError::Unavailable(err.to_string()),
            ClientError::Status(status)
                if matches!(status.code(), Code::Unavailable | Code::DeadlineExceeded) =>
            {
                DomainError::Unavailable(err.to_string())
            }
            _ => DomainError::Unexpected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ClientError;
    use crate::domain::error::DomainError;

    #[test]
    fn timeouts_become_unavailable() {
        let err: DomainError = ClientError::Timeout {
            service: "media",
            deadline: Duration::from_millis(5),
        }
        .into();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[test]
    fn unavailable_status_becomes_unavailable() {
        let err: DomainError = ClientError::Status(tonic::Status::unavailable("down")).into();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[test]
    fn other_statuses_are_internal() {
        let err: DomainError = ClientError::Status(tonic::Status::not_found("no media")).into();
        assert!(matches!(err, DomainError::Unexpected(_)));
    }
}
