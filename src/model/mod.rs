//! Row and document types.
//!
//! ```text
//! query layer ──► rows (flat, denormalized) ──► assemble ──► FoodDocument
//! ```

mod document;
mod rows;

pub use document::{
    Citation, CodeName, FoodDocument, LangualChild, LangualNode, MainNutrient, Micronutrients,
    NutrientMeasurement, NutrientMeasurements,
};
pub use rows::{FoodRow, LangualRow, MeasurementRow, ReferenceRow, TranslationRow};
