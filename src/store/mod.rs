//! Relational query layer.
//!
//! [`FoodSource`] is the seam between the assembler and the database: five
//! reads, one per result set of a single-food lookup. [`SqliteFoodStore`] is
//! the SQLite implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         FoodSource                          │
//! │  find_food()  translations()  measurements()                │
//! │  langual_codes()  references(codes)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            SqliteFoodStore (rusqlite, one connection)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod schema;
mod seed;
mod sqlite;

pub use seed::{
    Seed, SeedCodeName, SeedFood, SeedLangualCode, SeedMeasurement, SeedNutrient, SeedSummary,
};
pub use sqlite::SqliteFoodStore;

use async_trait::async_trait;

use crate::assemble::FoodKey;
use crate::model::{FoodRow, LangualRow, MeasurementRow, ReferenceRow, TranslationRow};

/// Errors that can occur in the query layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reference lookup requires at least one code")]
    EmptyKeySet,

    #[error("Database schema version {found} does not match expected {expected}")]
    SchemaVersion { found: i32, expected: i32 },

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reads backing a single-food lookup.
///
/// Row order is part of the contract: measurements come back in measurement
/// id order and each measurement's reference codes ascending, so the
/// assembled document is stable across requests.
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Base food row, or `None` when no food matches `key`.
    async fn find_food(&self, key: &FoodKey) -> StoreResult<Option<FoodRow>>;

    async fn translations(&self, food_id: i64) -> StoreResult<Vec<TranslationRow>>;

    async fn measurements(&self, food_id: i64) -> StoreResult<Vec<MeasurementRow>>;

    async fn langual_codes(&self, food_id: i64) -> StoreResult<Vec<LangualRow>>;

    /// Bulk reference lookup.
    ///
    /// Calling this with no codes is a caller error and yields
    /// [`StoreError::EmptyKeySet`].
    async fn references(&self, codes: &[i64]) -> StoreResult<Vec<ReferenceRow>>;
}
