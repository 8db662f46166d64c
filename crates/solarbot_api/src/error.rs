//! Outward error taxonomy for request handlers.
//!
//! # Invariants
//! - Validation and not-found outcomes are expected results and are not
//!   logged as errors.
//! - Internal faults are logged once, with the full cause chain, and the
//!   caller only sees a generic message.

use crate::response::{ApiResponse, ApiStatus};
use log::{error, info};
use solarbot_core::{PanelId, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// Caller input violates a required-field or consistency rule.
    Validation(String),
    /// No panel has the requested id.
    NotFound(PanelId),
    /// Storage fault while serving the request.
    Storage(StoreError),
    /// Response body could not be encoded.
    Encoding(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> ApiStatus {
        match self {
            Self::Validation(_) => ApiStatus::BadRequest,
            Self::NotFound(_) => ApiStatus::NotFound,
            Self::Storage(_) | Self::Encoding(_) => ApiStatus::InternalError,
        }
    }

    /// Logs the error for `operation` and converts it into a response.
    pub(crate) fn into_response(self, operation: &'static str) -> ApiResponse {
        let status = self.status();
        match &self {
            Self::Validation(reason) => {
                info!("event={operation} module=api status=rejected reason={reason}");
                ApiResponse::message(status, reason.clone())
            }
            Self::NotFound(id) => {
                info!("event={operation} module=api status=not_found panel_id={id}");
                ApiResponse::message(status, format!("solar panel {id} not found"))
            }
            Self::Storage(_) | Self::Encoding(_) => {
                error!(
                    "event={operation} module=api status=error error={}",
                    error_chain(&self)
                );
                ApiResponse::message(status, "internal error while handling solar panel request")
            }
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "{reason}"),
            Self::NotFound(id) => write!(f, "solar panel {id} not found"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Encoding(err) => write!(f, "response encoding failure: {err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Validation(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encoding(value)
    }
}

/// Renders `err` followed by each nested cause, separated by `: `.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Wrapper errors often repeat their inner message verbatim.
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::{error_chain, ApiError};
    use crate::response::ApiStatus;
    use solarbot_core::{PanelValidationError, StoreError};

    #[test]
    fn store_validation_maps_to_bad_request() {
        let err = ApiError::from(StoreError::Validation(PanelValidationError::EmptyName));
        assert_eq!(err.status(), ApiStatus::BadRequest);
    }

    #[test]
    fn internal_response_hides_cause() {
        let err = ApiError::from(StoreError::InvalidData("secret detail".to_string()));
        assert!(error_chain(&err).contains("secret detail"));

        let response = err.into_response("panel_list");
        assert_eq!(response.status, ApiStatus::InternalError);
        assert!(!response.message_text().unwrap().contains("secret detail"));
    }
}
