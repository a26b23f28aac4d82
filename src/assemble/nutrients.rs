//! Grouping of flat measurement rows into the nutrient sections of a food.
//!
//! One pass over the rows, in input order:
//!
//! ```text
//! energy         ──► energy
//! macronutrient  ──► main (IndexMap keyed by nutrient id)
//! component      ──► main[macronutrient_id].components
//! micronutrient  ──► vitamins | minerals
//! ```
//!
//! A component may precede its macronutrient in the input. It is parked
//! under the macronutrient id and attached, in arrival order, once the
//! macronutrient row shows up. Whatever is still parked at the end of the
//! pass has no owner in this batch and is dropped with a warning.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, warn};

use super::projection::optional_text;
use super::references::ReferenceCollector;
use super::{AssembleError, AssembleResult};
use crate::model::{
    MainNutrient, MeasurementRow, Micronutrients, NutrientMeasurement, NutrientMeasurements,
};

/// Category tag of a measurement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientType {
    Energy,
    Macronutrient,
    Component,
    Micronutrient,
}

impl NutrientType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "energy" => Some(NutrientType::Energy),
            "macronutrient" => Some(NutrientType::Macronutrient),
            "component" => Some(NutrientType::Component),
            "micronutrient" => Some(NutrientType::Micronutrient),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientType::Energy => "energy",
            NutrientType::Macronutrient => "macronutrient",
            NutrientType::Component => "component",
            NutrientType::Micronutrient => "micronutrient",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicronutrientType {
    Vitamin,
    Mineral,
}

impl MicronutrientType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vitamin" => Some(MicronutrientType::Vitamin),
            "mineral" => Some(MicronutrientType::Mineral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MicronutrientType::Vitamin => "vitamin",
            MicronutrientType::Mineral => "mineral",
        }
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedNutrients {
    pub measurements: NutrientMeasurements,
    /// Components dropped because no macronutrient in the batch owns them.
    pub unattached_components: usize,
}

/// A component waiting for its macronutrient row.
struct Parked {
    measurement_id: i64,
    measurement: NutrientMeasurement,
}

/// Group `rows` into nutrient sections.
///
/// The reference codes of every row are added to `references` as a side
/// effect of the same pass. Fails on the first row carrying a type tag this
/// crate does not know.
pub fn aggregate(
    rows: Vec<MeasurementRow>,
    references: &mut ReferenceCollector,
) -> AssembleResult<AggregatedNutrients> {
    let mut energy = Vec::new();
    let mut vitamins = Vec::new();
    let mut minerals = Vec::new();
    let mut main: IndexMap<i64, MainNutrient> = IndexMap::new();
    let mut parked: IndexMap<i64, Vec<Parked>> = IndexMap::new();
    let mut unattached = 0;

    for row in rows {
        references.collect(&row.reference_codes);

        let nutrient_type = NutrientType::parse(&row.nutrient_type).ok_or_else(|| {
            AssembleError::invalid_input(
                row.id,
                format!("unrecognized nutrient type '{}'", row.nutrient_type),
            )
        })?;

        match nutrient_type {
            NutrientType::Energy => energy.push(to_measurement(row)),

            NutrientType::Macronutrient => {
                let nutrient_id = row.nutrient_id;
                let measurement = to_measurement(row);

                match main.entry(nutrient_id) {
                    Entry::Occupied(mut entry) => {
                        // Keep position and components; take the latest fields.
                        debug!(nutrient_id, "macronutrient measured twice");
                        entry.get_mut().measurement = measurement;
                    }
                    Entry::Vacant(entry) => {
                        let components = parked
                            .shift_remove(&nutrient_id)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|p| p.measurement)
                            .collect();
                        entry.insert(MainNutrient {
                            measurement,
                            components,
                        });
                    }
                }
            }

            NutrientType::Component => {
                let Some(owner) = row.macronutrient_id else {
                    warn!(
                        measurement_id = row.id,
                        "component has no macronutrient, dropping"
                    );
                    unattached += 1;
                    continue;
                };

                let measurement_id = row.id;
                let measurement = to_measurement(row);

                match main.get_mut(&owner) {
                    Some(parent) => parent.components.push(measurement),
                    None => parked.entry(owner).or_default().push(Parked {
                        measurement_id,
                        measurement,
                    }),
                }
            }

            NutrientType::Micronutrient => {
                let kind = match row.micronutrient_type.as_deref() {
                    Some(tag) => MicronutrientType::parse(tag).ok_or_else(|| {
                        AssembleError::invalid_input(
                            row.id,
                            format!("unrecognized micronutrient type '{}'", tag),
                        )
                    })?,
                    None => {
                        return Err(AssembleError::invalid_input(
                            row.id,
                            "micronutrient without a micronutrient type",
                        ))
                    }
                };

                match kind {
                    MicronutrientType::Vitamin => vitamins.push(to_measurement(row)),
                    MicronutrientType::Mineral => minerals.push(to_measurement(row)),
                }
            }
        }
    }

    for (macronutrient_id, orphans) in parked {
        for orphan in orphans {
            warn!(
                measurement_id = orphan.measurement_id,
                macronutrient_id,
                "component references a macronutrient missing from the batch, dropping"
            );
            unattached += 1;
        }
    }

    Ok(AggregatedNutrients {
        measurements: NutrientMeasurements {
            energy,
            main_nutrients: main.into_values().collect(),
            micronutrients: Micronutrients { vitamins, minerals },
        },
        unattached_components: unattached,
    })
}

fn to_measurement(row: MeasurementRow) -> NutrientMeasurement {
    NutrientMeasurement {
        nutrient_id: row.nutrient_id,
        name: row.name,
        measurement_unit: row.measurement_unit,
        average: row.average,
        deviation: row.deviation,
        min: row.min,
        max: row.max,
        sample_size: row.sample_size,
        standardized: row.standardized,
        data_type: row.data_type,
        note: optional_text(row.note),
        reference_codes: row.reference_codes,
    }
}
