use serde::{Deserialize, Serialize};

/// Wrapper for endpoints whose whole answer is a confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    // ---
    pub fn new(message: impl Into<String>) -> Self {
        // ---
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Error payload shape shared by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    // ---
    pub error: String,
}
