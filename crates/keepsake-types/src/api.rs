use serde::{Deserialize, Serialize};

// -- Capsules --

/// Form body of `POST /`. A missing `message` reads as empty and is rejected
/// by validation rather than by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCapsuleForm {
    #[serde(default)]
    pub message: String,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCapsuleResponse {
    pub link: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
