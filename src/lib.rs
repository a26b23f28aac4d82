//! # foodcomp
//!
//! Food composition documents assembled from a relational store.
//!
//! ## Architecture
//!
//! A lookup turns the flat result sets of a handful of queries into one
//! nested document per food:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              SQLite store (FoodSource)                  │
//! │  food, translations, measurements, LanguaL, references  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [rows]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ResponseAssembler                      │
//! │  nutrient aggregation, LanguaL hierarchy,               │
//! │  reference collection, optional-field projection        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [cited codes]
//! ┌─────────────────────────────────────────────────────────┐
//! │                reference lookup (bulk)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        FoodDocument (JSON via CLI or HTTP)              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod assemble;
pub mod config;
pub mod lookup;
pub mod model;
pub mod store;

#[cfg(feature = "server")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::assemble::{
        AssembleError, AssembleResult, AssemblyInput, FoodKey, ResponseAssembler,
    };
    pub use crate::lookup::{fetch_food_document, LookupError};
    pub use crate::model::{
        Citation, FoodDocument, FoodRow, LangualRow, MeasurementRow, ReferenceRow,
        TranslationRow,
    };
    pub use crate::store::{FoodSource, Seed, SqliteFoodStore, StoreError};
}

pub use lookup::fetch_food_document;
pub use model::FoodDocument;
