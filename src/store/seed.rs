//! JSON seed files for populating a database.
//!
//! A seed carries the lookup tables (groups, types, languages, nutrients,
//! LanguaL codes, references) followed by the foods that point into them:
//!
//! ```json
//! {
//!   "foodGroups": [{ "code": "A", "name": "Cereals" }],
//!   "foodTypes": [{ "code": "N", "name": "Natural" }],
//!   "languages": [{ "code": "es", "name": "Español" }],
//!   "nutrients": [{ "id": 208, "name": "Energy", "type": "energy", "measurementUnit": "kcal" }],
//!   "langualCodes": [{ "code": "A0256", "descriptor": "FOOD GROUP" }],
//!   "references": [{ "code": 1, "title": "...", "type": "report", "authors": ["..."] }],
//!   "foods": [{
//!     "id": 1, "code": "CL0001", "groupCode": "A", "typeCode": "N",
//!     "translations": [{ "languageCode": "es", "commonName": "Arroz" }],
//!     "measurements": [{ "nutrientId": 208, "average": 360.0, "dataType": "analytic" }],
//!     "langualCodes": ["A0256"]
//!   }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::StoreResult;
use crate::model::{ReferenceRow, TranslationRow};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seed {
    pub food_groups: Vec<SeedCodeName>,
    pub food_types: Vec<SeedCodeName>,
    pub languages: Vec<SeedCodeName>,
    pub nutrients: Vec<SeedNutrient>,
    pub langual_codes: Vec<SeedLangualCode>,
    pub references: Vec<ReferenceRow>,
    pub foods: Vec<SeedFood>,
}

impl Seed {
    /// Read a seed from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedCodeName {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedNutrient {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub nutrient_type: String,
    pub measurement_unit: String,
    #[serde(default)]
    pub standardized: bool,
    #[serde(default)]
    pub note: Option<String>,
    /// For components: the owning macronutrient's nutrient id.
    #[serde(default)]
    pub macronutrient_id: Option<i64>,
    /// For micronutrients: `vitamin` or `mineral`.
    #[serde(default)]
    pub micronutrient_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLangualCode {
    pub code: String,
    pub descriptor: String,
    #[serde(default)]
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFood {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub strain: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
    pub group_code: String,
    pub type_code: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub subspecies: Option<String>,
    #[serde(default)]
    pub translations: Vec<TranslationRow>,
    #[serde(default)]
    pub measurements: Vec<SeedMeasurement>,
    #[serde(default)]
    pub langual_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedMeasurement {
    pub nutrient_id: i64,
    pub average: f64,
    #[serde(default)]
    pub deviation: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub sample_size: Option<i64>,
    pub data_type: String,
    #[serde(default)]
    pub reference_codes: Vec<i64>,
}

/// Row counts written by a seed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub foods: usize,
    pub nutrients: usize,
    pub measurements: usize,
    pub references: usize,
    pub langual_codes: usize,
}
