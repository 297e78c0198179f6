//! Wire types consumed from Artifactory responses.

use serde::{Deserialize, Serialize};

/// Error body returned by Artifactory on non-2xx responses:
/// `{"errors": [{"status": 404, "message": "..."}]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub errors: Vec<ErrorEntry>,
}

/// A single entry of an `ErrorPayload`. Fields other than `message` are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEntry {
    pub message: String,
}

impl ErrorPayload {
    /// All messages joined with newlines, in server order.
    pub fn joined_messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
