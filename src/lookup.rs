//! Single-food lookup pipeline.
//!
//! Resolves the food row, fetches translations, measurements and LanguaL
//! codes concurrently, aggregates them, and only then asks for the
//! references the measurements actually cite.

use futures::try_join;
use tracing::{debug, warn};

use crate::assemble::{AssembleError, AssemblyInput, FoodKey, ResponseAssembler};
use crate::model::FoodDocument;
use crate::store::{FoodSource, StoreError};

/// Errors that can occur while looking up a food.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::Assemble(e) if e.is_not_found())
    }
}

/// Build the full document for the food identified by `raw_id`.
///
/// `raw_id` is either a numeric id or a food code. Anything that is neither,
/// and any identifier with no matching food, is reported as not found.
pub async fn fetch_food_document<S>(source: &S, raw_id: &str) -> Result<FoodDocument, LookupError>
where
    S: FoodSource + ?Sized,
{
    let key = FoodKey::parse(raw_id)?;

    let food = source
        .find_food(&key)
        .await?
        .ok_or_else(|| AssembleError::not_found(key.to_string()))?;
    let food_id = food.id;

    let (translations, measurements, langual_codes) = try_join!(
        source.translations(food_id),
        source.measurements(food_id),
        source.langual_codes(food_id),
    )?;

    debug!(
        food_id,
        translations = translations.len(),
        measurements = measurements.len(),
        langual_codes = langual_codes.len(),
        "fetched food rows"
    );

    let pending = ResponseAssembler::begin(
        &key,
        AssemblyInput {
            food: Some(food),
            translations,
            measurements,
            langual_codes,
        },
    )?;

    if pending.unattached_components() > 0 {
        warn!(
            food_id,
            dropped = pending.unattached_components(),
            "components without a measured macronutrient were dropped"
        );
    }

    let reference_rows = if pending.needs_references() {
        source.references(&pending.reference_codes()).await?
    } else {
        Vec::new()
    };

    Ok(pending.finish(reference_rows))
}
