//! Flat rows produced by the query layer.
//!
//! These mirror the result sets of the five single-food queries one to one.
//! Type tags stay as raw text here; the aggregator classifies them and
//! rejects values it does not recognise.

use serde::{Deserialize, Serialize};

/// Base food row, already joined with its group and type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRow {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub strain: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
    pub group_code: String,
    pub group_name: String,
    pub type_code: String,
    pub type_name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub subspecies: Option<String>,
}

/// One language-specific name/ingredients pair of a food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRow {
    pub language_code: String,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// One nutrient measurement of a food, joined with its nutrient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRow {
    pub id: i64,
    pub nutrient_id: i64,
    pub name: String,
    /// `energy`, `macronutrient`, `component` or `micronutrient`.
    #[serde(rename = "type")]
    pub nutrient_type: String,
    /// Owning macronutrient's nutrient id. Only set for components.
    #[serde(default)]
    pub macronutrient_id: Option<i64>,
    /// `vitamin` or `mineral`. Only set for micronutrients.
    #[serde(default)]
    pub micronutrient_type: Option<String>,
    pub measurement_unit: String,
    pub average: f64,
    #[serde(default)]
    pub deviation: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub sample_size: Option<i64>,
    pub standardized: bool,
    pub data_type: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub reference_codes: Vec<i64>,
}

/// A LanguaL code of a food, with its parent flattened into the same row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangualRow {
    pub code: String,
    pub descriptor: String,
    #[serde(default)]
    pub parent_code: Option<String>,
    #[serde(default)]
    pub parent_descriptor: Option<String>,
}

/// A bibliographic reference with its authors already aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRow {
    pub code: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub reference_type: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub page_start: Option<i64>,
    #[serde(default)]
    pub page_end: Option<i64>,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub issue: Option<i64>,
    #[serde(default)]
    pub volume_year: Option<i64>,
    #[serde(default)]
    pub journal_name: Option<String>,
}
