//! Response envelope returned by every handler.

use serde::Serialize;
use serde_json::{json, Value};

/// Outcome class of a handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    InternalError,
}

impl ApiStatus {
    /// HTTP status code for this outcome.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }
}

/// Handler result: status, optional `Location`, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: ApiStatus,
    /// Set for `Created` responses.
    pub location: Option<String>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub(crate) fn json(status: ApiStatus, body: Value) -> Self {
        Self {
            status,
            location: None,
            body: Some(body),
        }
    }

    pub(crate) fn no_content() -> Self {
        Self {
            status: ApiStatus::NoContent,
            location: None,
            body: None,
        }
    }

    pub(crate) fn message(status: ApiStatus, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "message": message.into() }))
    }

    pub(crate) fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    /// Decodes the body into `T`; `None` when there is no body or it does
    /// not match.
    pub fn body_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_value(body.clone()).ok())
    }

    /// `message` field of an error body.
    pub fn message_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
    }
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}
