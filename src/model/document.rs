//! The nested single-food document returned by the lookup endpoint.
//!
//! Every optional field is skipped during serialization when `None`, so the
//! JSON never carries a `null` for an optional attribute.

use std::collections::BTreeMap;

use serde::Serialize;

/// A `{code, name}` pair used for the food group and food type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// A single nutrient measurement as it appears in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientMeasurement {
    /// Grouping key only; not part of the serialized document.
    #[serde(skip)]
    pub nutrient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<i64>,
    pub standardized: bool,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_codes: Vec<i64>,
}

/// A macronutrient together with the components measured under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainNutrient {
    #[serde(flatten)]
    pub measurement: NutrientMeasurement,
    pub components: Vec<NutrientMeasurement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Micronutrients {
    pub vitamins: Vec<NutrientMeasurement>,
    pub minerals: Vec<NutrientMeasurement>,
}

/// All measurements of a food, grouped by nutrient category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientMeasurements {
    pub energy: Vec<NutrientMeasurement>,
    pub main_nutrients: Vec<MainNutrient>,
    pub micronutrients: Micronutrients,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangualChild {
    pub code: String,
    pub descriptor: String,
}

/// A top-level LanguaL descriptor and the descriptors filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangualNode {
    pub code: String,
    pub descriptor: String,
    pub children: Vec<LangualChild>,
}

/// A bibliographic reference backing one or more measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub code: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub reference_type: String,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_name: Option<String>,
}

/// The complete single-food document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDocument {
    pub id: i64,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    pub group: CodeName,
    #[serde(rename = "type")]
    pub food_type: CodeName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subspecies: Option<String>,
    /// Common names keyed by language code.
    pub common_name: BTreeMap<String, String>,
    /// Ingredient lists keyed by language code.
    pub ingredients: BTreeMap<String, String>,
    pub nutrient_measurements: NutrientMeasurements,
    pub langual_codes: Vec<LangualNode>,
    pub references: Vec<Citation>,
}
