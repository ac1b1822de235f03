use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Infrastructure failures from a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors surfaced by [`Store`](crate::store::Store) write operations.
///
/// Business rejections (insufficient stock, duplicates, empty input) are
/// expected outcomes the routes turn into user-facing messages. `Backend`
/// wraps an infrastructure failure that was already logged at the store
/// boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not enough stock for {flavor}: have {available}, need {requested}")]
    InsufficientStock {
        flavor: String,
        available: u32,
        requested: u32,
    },

    #[error("flavor \"{0}\" already exists")]
    DuplicateFlavor(String),

    #[error("flavor name is empty")]
    EmptyFlavor,

    #[error("quantity must be positive")]
    ZeroQuantity,

    #[error("storage error")]
    Backend(#[from] BackendError),
}

impl StoreError {
    /// True for expected business rejections, false for backend failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, StoreError::Backend(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
