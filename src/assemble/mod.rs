//! Single-food response assembly.
//!
//! Folds the flat result sets of one food into a [`FoodDocument`]:
//!
//! ```text
//! ┌────────────┐ ┌──────────────┐ ┌──────────────┐ ┌─────────────┐
//! │  FoodRow   │ │ Translations │ │ Measurements │ │ LangualRows │
//! └─────┬──────┘ └──────┬───────┘ └──────┬───────┘ └──────┬──────┘
//!       │ project       │ reduce         │ aggregate      │ build
//!       │               │                ├──► codes ──► reference fetch
//!       ▼               ▼                ▼                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          FoodDocument                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reference fetch is the only step that depends on another: it is keyed
//! on the codes collected while aggregating measurements. Assembly is
//! therefore split in two phases, [`ResponseAssembler::begin`] and
//! [`PendingDocument::finish`], with the fetch in between. For callers with a
//! synchronous fetch, [`ResponseAssembler::assemble`] runs both.
//!
//! Everything here is pure and request-scoped. Any error aborts assembly;
//! no partial document is ever produced.

pub mod langual;
pub mod nutrients;
pub mod projection;
pub mod references;

use std::collections::BTreeMap;

use crate::model::{
    CodeName, FoodDocument, FoodRow, LangualNode, LangualRow, MeasurementRow, ReferenceRow,
    TranslationRow,
};

pub use nutrients::{AggregatedNutrients, MicronutrientType, NutrientType};
pub use projection::{optional_text, Project};
pub use references::ReferenceCollector;

/// Longest accepted food code.
const MAX_CODE_LEN: usize = 32;

/// Errors that abort assembly of a food document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssembleError {
    /// No food matches the identifier, or the identifier is malformed.
    #[error("Food not found: {key}")]
    NotFound { key: String },

    /// A measurement row carries a type tag the assembler does not know.
    #[error("Invalid measurement {measurement_id}: {message}")]
    InvalidInput {
        measurement_id: i64,
        message: String,
    },
}

impl AssembleError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn invalid_input(measurement_id: i64, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            measurement_id,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type AssembleResult<T> = Result<T, AssembleError>;

/// How a food is identified in a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodKey {
    /// Internal numeric id.
    Id(i64),
    /// Public food code, e.g. `CL0001`.
    Code(String),
}

impl FoodKey {
    /// Decide whether `raw` can identify a food at all.
    ///
    /// Positive integers are ids. Otherwise the value must be a well-formed
    /// food code (see [`FoodKey::is_valid_code`]). A malformed identifier
    /// cannot match any food and is reported as [`AssembleError::NotFound`].
    pub fn parse(raw: &str) -> AssembleResult<Self> {
        let raw = raw.trim();

        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return match raw.parse::<i64>() {
                Ok(id) if id > 0 => Ok(FoodKey::Id(id)),
                _ => Err(AssembleError::not_found(raw)),
            };
        }

        if Self::is_valid_code(raw) {
            Ok(FoodKey::Code(raw.to_string()))
        } else {
            Err(AssembleError::not_found(raw))
        }
    }

    /// Food code grammar: ASCII letters, digits, `-` or `_`, starting with a
    /// letter or digit, containing at least one letter, at most 32
    /// characters.
    ///
    /// A code never parses as a numeric id.
    pub fn is_valid_code(code: &str) -> bool {
        code.len() <= MAX_CODE_LEN
            && code.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric())
            && code.bytes().any(|b| b.is_ascii_alphabetic())
            && code
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl std::fmt::Display for FoodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoodKey::Id(id) => write!(f, "{}", id),
            FoodKey::Code(code) => write!(f, "{}", code),
        }
    }
}

/// Common names and ingredient lists keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    pub common_name: BTreeMap<String, String>,
    pub ingredients: BTreeMap<String, String>,
}

impl Translations {
    /// Split translation rows into the two per-language maps.
    ///
    /// A row contributes to each map only where its value is present and
    /// not blank.
    pub fn reduce(rows: Vec<TranslationRow>) -> Self {
        let mut translations = Translations::default();

        for row in rows {
            if let Some(name) = optional_text(row.common_name) {
                translations
                    .common_name
                    .insert(row.language_code.clone(), name);
            }
            if let Some(ingredients) = optional_text(row.ingredients) {
                translations
                    .ingredients
                    .insert(row.language_code, ingredients);
            }
        }

        translations
    }
}

/// Rows of one food, as fetched before the reference lookup.
#[derive(Debug, Clone, Default)]
pub struct AssemblyInput {
    pub food: Option<FoodRow>,
    pub translations: Vec<TranslationRow>,
    pub measurements: Vec<MeasurementRow>,
    pub langual_codes: Vec<LangualRow>,
}

/// Entry points for building a [`FoodDocument`].
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// First phase: everything except the references.
    ///
    /// `key` is only used for the not-found error.
    pub fn begin(key: &FoodKey, input: AssemblyInput) -> AssembleResult<PendingDocument> {
        let food = input
            .food
            .ok_or_else(|| AssembleError::not_found(key.to_string()))?
            .project();

        let translations = Translations::reduce(input.translations);

        let mut references = ReferenceCollector::new();
        let nutrients = nutrients::aggregate(input.measurements, &mut references)?;

        let langual_codes = langual::build(input.langual_codes);

        Ok(PendingDocument {
            food,
            translations,
            nutrients,
            langual_codes,
            references,
        })
    }

    /// Run both phases, calling `fetch_references` between them.
    ///
    /// `fetch_references` receives exactly the distinct reference codes cited
    /// by the measurements and is not called when there are none.
    pub fn assemble<F, E>(
        key: &FoodKey,
        input: AssemblyInput,
        fetch_references: F,
    ) -> Result<FoodDocument, E>
    where
        F: FnOnce(&[i64]) -> Result<Vec<ReferenceRow>, E>,
        E: From<AssembleError>,
    {
        let pending = Self::begin(key, input)?;
        let reference_rows = if pending.needs_references() {
            fetch_references(&pending.reference_codes())?
        } else {
            Vec::new()
        };
        Ok(pending.finish(reference_rows))
    }
}

/// A document waiting for its reference rows.
#[derive(Debug, Clone)]
pub struct PendingDocument {
    food: FoodRow,
    translations: Translations,
    nutrients: AggregatedNutrients,
    langual_codes: Vec<LangualNode>,
    references: ReferenceCollector,
}

impl PendingDocument {
    /// Whether any measurement cites a reference.
    pub fn needs_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// Distinct reference codes to fetch, ascending.
    pub fn reference_codes(&self) -> Vec<i64> {
        self.references.codes()
    }

    pub fn food_id(&self) -> i64 {
        self.food.id
    }

    pub fn unattached_components(&self) -> usize {
        self.nutrients.unattached_components
    }

    /// Second phase: merge everything into the final document.
    pub fn finish(self, reference_rows: Vec<ReferenceRow>) -> FoodDocument {
        let references = self.references.resolve(reference_rows);
        let food = self.food;

        FoodDocument {
            id: food.id,
            code: food.code,
            strain: food.strain,
            brand: food.brand,
            observation: food.observation,
            group: CodeName {
                code: food.group_code,
                name: food.group_name,
            },
            food_type: CodeName {
                code: food.type_code,
                name: food.type_name,
            },
            scientific_name: food.scientific_name,
            subspecies: food.subspecies,
            common_name: self.translations.common_name,
            ingredients: self.translations.ingredients,
            nutrient_measurements: self.nutrients.measurements,
            langual_codes: self.langual_codes,
            references,
        }
    }
}
