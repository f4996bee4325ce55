//! Request-level error taxonomy.

use crate::config::ErrorStatusPolicy;
use crate::model::item::ItemId;
use crate::store::StoreError;
use crate::update::UpdateBuildError;
use log::Level;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure raised while dispatching one request.
#[derive(Debug)]
pub enum HandlerError {
    /// Update payload has nothing mutable, or the store refused the directive.
    InvalidUpdate(String),
    /// No item exists under the requested id.
    NotFound(ItemId),
    /// Method outside GET/POST/PUT/DELETE/OPTIONS.
    UnsupportedMethod(String),
    /// Body is not a JSON object.
    MalformedBody(String),
    /// PUT or DELETE arrived without a path id.
    MissingIdentifier(&'static str),
    /// The item store failed for infrastructural reasons.
    StoreUnavailable(StoreError),
}

impl HandlerError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUpdate(_) => "invalid_update",
            Self::NotFound(_) => "not_found",
            Self::UnsupportedMethod(_) => "unsupported_method",
            Self::MalformedBody(_) => "malformed_body",
            Self::MissingIdentifier(_) => "missing_identifier",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Log level for the failure record; caller mistakes are warnings.
    pub fn log_level(&self) -> Level {
        match self {
            Self::StoreUnavailable(_) => Level::Error,
            _ => Level::Warn,
        }
    }

    /// HTTP status for this error under `policy`.
    pub fn status_code(&self, policy: ErrorStatusPolicy) -> u16 {
        if policy == ErrorStatusPolicy::Uniform {
            return 400;
        }
        match self {
            Self::InvalidUpdate(_) | Self::MalformedBody(_) | Self::MissingIdentifier(_) => 400,
            Self::NotFound(_) => 404,
            Self::UnsupportedMethod(_) => 405,
            Self::StoreUnavailable(_) => 502,
        }
    }
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUpdate(message) => write!(f, "{message}"),
            Self::NotFound(id) => write!(f, "Item with id {id} not found."),
            Self::UnsupportedMethod(method) => write!(f, "Unsupported method: {method}"),
            Self::MalformedBody(message) => write!(f, "Malformed request body: {message}"),
            Self::MissingIdentifier(method) => {
                write!(f, "{method} requires an item id in the path.")
            }
            Self::StoreUnavailable(_) => write!(f, "Item store is unavailable."),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UpdateBuildError> for HandlerError {
    fn from(value: UpdateBuildError) -> Self {
        Self::InvalidUpdate(value.to_string())
    }
}

impl From<StoreError> for HandlerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::InvalidUpdate(err) => Self::InvalidUpdate(err.to_string()),
            other => Self::StoreUnavailable(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HandlerError;
    use crate::config::ErrorStatusPolicy;
    use crate::store::StoreError;
    use crate::update::UpdateBuildError;
use log::Level;

    #[test]
    fn differentiated_policy_maps_each_condition() {
        let policy = ErrorStatusPolicy::Differentiated;
        assert_eq!(
            HandlerError::from(UpdateBuildError::NoMutableFields).status_code(policy),
            400
        );
        assert_eq!(HandlerError::NotFound("x".into()).status_code(policy), 404);
        assert_eq!(
            HandlerError::UnsupportedMethod("PATCH".into()).status_code(policy),
            405
        );
        assert_eq!(
            HandlerError::from(StoreError::Unavailable("down".into())).status_code(policy),
            502
        );
    }

    #[test]
    fn uniform_policy_always_returns_400() {
        let policy = ErrorStatusPolicy::Uniform;
        assert_eq!(HandlerError::NotFound("x".into()).status_code(policy), 400);
        assert_eq!(
            HandlerError::from(StoreError::Unavailable("down".into())).status_code(policy),
            400
        );
    }

    #[test]
    fn only_store_failures_log_at_error_level() {
        assert_eq!(
            HandlerError::from(StoreError::Unavailable("down".into())).log_level(),
            Level::Error
        );
        for err in [
            HandlerError::NotFound("x".into()),
            HandlerError::InvalidUpdate("No update data provided.".into()),
            HandlerError::MalformedBody("eof".into()),
            HandlerError::UnsupportedMethod("PATCH".into()),
            HandlerError::MissingIdentifier("PUT"),
        ] {
            assert_eq!(err.log_level(), Level::Warn, "{}", err.code());
        }
    }

    #[test]
    fn store_failure_message_hides_backend_detail() {
        let err = HandlerError::from(StoreError::Unavailable("disk /dev/sda1 failed".into()));
        assert_eq!(err.to_string(), "Item store is unavailable.");
        assert_eq!(err.code(), "store_unavailable");
    }

    #[test]
    fn build_error_message_passes_through() {
        let err = HandlerError::from(UpdateBuildError::NoMutableFields);
        assert_eq!(err.to_string(), "No update data provided.");
    }
}
