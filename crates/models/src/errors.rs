use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("field allow-list error: {0}")]
    Fields(String),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
