//! Book (catalog) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book with its count of copies currently not on loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    /// Copies available for lending, never negative
    pub available: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available > 0
    }
}

/// Catalog insertion
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub author: Option<String>,
    pub available: i64,
}
