//! Error types for the currency exchange service.

use exchange_rates::ProviderError;

/// Domain-level errors (business rule violations).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Currency '{0}' is not supported")]
    CurrencyNotSupported(String),

    #[error("Exchange rate not found for {from} to {to}")]
    RateNotFound { from: String, to: String },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Errors raised by the rate and converter services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The rate provider was unreachable, failed, or sent an unusable snapshot.
    #[error("{message}")]
    ExternalService {
        message: String,
        #[source]
        source: Option<ProviderError>,
    },

    #[error(transparent)]
    Repo(RepoError),
}

impl ServiceError {
    /// An unusable snapshot with no underlying provider error.
    pub fn malformed(message: impl Into<String>) -> Self {
        ServiceError::ExternalService {
            message: message.into(),
            source: None,
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        ServiceError::ExternalService {
            message: "Failed to fetch exchange rates".into(),
            source: Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => ServiceError::Domain(e),
            other => ServiceError::Repo(other),
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::BadRequest(e.to_string()),
            ServiceError::ExternalService { message, .. } => AppError::ServiceUnavailable(message),
            ServiceError::Repo(RepoError::NotFound) => {
                AppError::NotFound("Resource not found".into())
            }
            ServiceError::Repo(RepoError::Domain(e)) => AppError::BadRequest(e.to_string()),
            ServiceError::Repo(RepoError::Database(e)) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_provider_error_is_kept_as_source() {
        let err: ServiceError = ProviderError::Transport("connection refused".into()).into();
        let source = err.source().expect("source retained");
        assert!(source.to_string().contains("connection refused"));
    }

    #[test]
    fn test_repo_domain_error_is_flattened() {
        let err: ServiceError =
            RepoError::Domain(DomainError::InvalidArgument("count".into())).into();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_app_error_mapping() {
        let bad: AppError = ServiceError::from(DomainError::CurrencyNotSupported("XXX".into())).into();
        assert!(matches!(bad, AppError::BadRequest(msg) if msg.contains("XXX")));

        let unavailable: AppError = ServiceError::malformed("Invalid response").into();
        assert!(matches!(unavailable, AppError::ServiceUnavailable(_)));

        let missing: AppError = ServiceError::from(RepoError::NotFound).into();
        assert!(matches!(missing, AppError::NotFound(_)));

        let internal: AppError = ServiceError::from(RepoError::Database("disk full".into())).into();
        assert!(matches!(internal, AppError::Internal(_)));
    }
}
