use axum::http::StatusCode;
use thiserror::Error;

use keepsake_crypto::CryptoError;
use keepsake_render::RenderError;

/// Everything a capsule operation can fail with. A locked capsule is not an
/// error; see `Revealed::Locked`.
#[derive(Debug, Error)]
pub enum CapsuleError {
    #[error("{0}")]
    Validation(String),

    #[error("capsule not found: {0}")]
    NotFound(String),

    #[error("encryption is not available: the capsule key failed to load at startup")]
    EncryptionUnavailable,

    #[error("capsule could not be decrypted")]
    DecryptionFailed(#[source] CryptoError),

    #[error("keepsake rendering failed")]
    RenderFailed(#[from] RenderError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CapsuleError {
    pub fn status(&self) -> StatusCode {
        match self {
            CapsuleError::Validation(_) => StatusCode::BAD_REQUEST,
            CapsuleError::NotFound(_) => StatusCode::NOT_FOUND,
            CapsuleError::EncryptionUnavailable
            | CapsuleError::DecryptionFailed(_)
            | CapsuleError::RenderFailed(_)
            | CapsuleError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
