use crate::error::{LedgerError, Result};
use serde::Serialize;
use serde_json::{Value, json};

/// Status and JSON body an HTTP layer would answer with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    /// Success becomes 200 with the payload; failures map through
    /// `LedgerError::status_code`.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result.and_then(|value| serde_json::to_value(value).map_err(LedgerError::from)) {
            Ok(body) => Self { status: 200, body },
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn from_error(err: &LedgerError) -> Self {
        if err.is_unexpected() {
            tracing::error!(error = %err, "Request failed unexpectedly");
        } else {
            tracing::debug!(error = %err, "Request rejected");
        }
        Self {
            status: err.status_code(),
            body: json!({ "error": err.public_reason() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
