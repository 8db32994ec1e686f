use std::sync::Arc;

use models::db::Database;
use sea_orm::DatabaseConnection;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub async fn conn(&self) -> Result<&DatabaseConnection, ApiError> {
        Ok(self.db.connection().await?)
    }
}
