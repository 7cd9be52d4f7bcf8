use async_trait::async_trait;
use serde_json::Value;
use teamtrack_core::{AppError, RecordId};
use thiserror::Error;

/// Failure categories reported by a resource transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The server rejected the request (4xx).
    BadRequest,
    /// The server failed while handling the request (5xx).
    Server,
    /// The request never produced a response (connect error, timeout).
    Network,
    /// The response body could not be read.
    Decode,
}

impl TransportErrorKind {
    /// Returns the machine-readable code carried on the wire.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "ERR_BAD_REQUEST",
            Self::Server => "ERR_BAD_RESPONSE",
            Self::Network => "ERR_NETWORK",
            Self::Decode => "ERR_DECODE",
        }
    }

    /// Parses a machine-readable code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ERR_BAD_REQUEST" => Some(Self::BadRequest),
            "ERR_BAD_RESPONSE" => Some(Self::Server),
            "ERR_NETWORK" | "ECONNABORTED" | "ETIMEDOUT" => Some(Self::Network),
            "ERR_DECODE" => Some(Self::Decode),
            _ => None,
        }
    }
}

/// Error returned by a [`ResourceTransport`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .kind.code(), .message)]
pub struct TransportError {
    /// Failure category.
    pub kind: TransportErrorKind,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Human-readable detail.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error without an HTTP status.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    /// Creates a transport error from a received HTTP status.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = if (400..500).contains(&status) {
            TransportErrorKind::BadRequest
        } else {
            TransportErrorKind::Server
        };

        Self {
            kind,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Recognizes an error-shaped reply body such as
    /// `{"code": "ERR_BAD_REQUEST", "name": "AxiosError"}`.
    #[must_use]
    pub fn from_reply(reply: &Value) -> Option<Self> {
        let object = reply.as_object()?;
        let kind = object
            .get("code")
            .and_then(Value::as_str)
            .and_then(TransportErrorKind::from_code)?;
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| object.get("name").and_then(Value::as_str))
            .unwrap_or("request failed");
        let status = object
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok());

        Some(Self {
            kind,
            status,
            message: message.to_owned(),
        })
    }

    /// Returns whether the server rejected the request itself.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        self.kind == TransportErrorKind::BadRequest
    }
}

impl From<TransportError> for AppError {
    fn from(error: TransportError) -> Self {
        AppError::Transport(error.to_string())
    }
}

/// Port for the remote REST API.
///
/// Paths are relative to the API base and never start with `/`.
#[async_trait]
pub trait ResourceTransport: Send + Sync {
    /// Issues `GET <path>`.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    /// Issues `POST <path>` with a JSON body.
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError>;

    /// Issues `PUT <path>` with a JSON body.
    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError>;

    /// Issues `DELETE <path>`.
    async fn delete(&self, path: &str) -> Result<Value, TransportError>;
}

/// Port asking the user to confirm a delete before any request is made.
#[async_trait]
pub trait DeleteConfirmation: Send + Sync {
    /// Returns `true` when the user picked "Delete", `false` on "Cancel".
    async fn confirm_delete(&self, resource: &str, item_id: RecordId) -> bool;
}

/// Returns the failure message carried by a reply body, if any.
#[must_use]
pub fn reply_failure_message(reply: &Value) -> Option<&str> {
    let message = reply.as_object()?.get("message")?;
    Some(message.as_str().unwrap_or("request failed"))
}

/// Returns whether a create or delete reply signals success.
///
/// `null`, `false` and bodies carrying a `message` are failures.
#[must_use]
pub fn is_success_reply(reply: &Value) -> bool {
    match reply {
        Value::Null | Value::Bool(false) => false,
        other => reply_failure_message(other).is_none(),
    }
}
