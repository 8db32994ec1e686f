use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    /// A batch aborted; `message` is safe to show, `detail` is for logs.
    #[error("{message}: {detail}")]
    Batch { message: &'static str, detail: String },
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(label: &str) -> Self {
        Self::NotFound(format!("{} not found", label))
    }

    pub fn batch(message: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::Batch { message, detail: cause.to_string() }
    }
}
