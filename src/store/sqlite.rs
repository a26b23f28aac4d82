//! SQLite-backed [`FoodSource`].
//!
//! A single `rusqlite::Connection` behind an async mutex. Queries are short
//! and local, so requests simply take turns on the connection.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use indexmap::map::Entry;
use indexmap::IndexMap;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::schema::*;
use super::seed::{Seed, SeedSummary};
use super::{FoodSource, StoreError, StoreResult};
use crate::assemble::FoodKey;
use crate::model::{FoodRow, LangualRow, MeasurementRow, ReferenceRow, TranslationRow};

/// Food database stored in a SQLite file.
pub struct SqliteFoodStore {
    conn: Mutex<Connection>,
}

impl SqliteFoodStore {
    /// Open or create the database at `path` and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened food database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Write a seed in one transaction. Nothing is written if any row fails.
    pub async fn load_seed(&self, seed: &Seed) -> StoreResult<SeedSummary> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let summary = write_seed(&tx, seed)?;
        tx.commit()?;

        info!(
            foods = summary.foods,
            measurements = summary.measurements,
            references = summary.references,
            "seed loaded"
        );
        Ok(summary)
    }

    /// Number of foods in the database.
    pub async fn food_count(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row(COUNT_FOODS, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl FoodSource for SqliteFoodStore {
    async fn find_food(&self, key: &FoodKey) -> StoreResult<Option<FoodRow>> {
        let conn = self.conn.lock().await;
        query_food(&conn, key)
    }

    async fn translations(&self, food_id: i64) -> StoreResult<Vec<TranslationRow>> {
        let conn = self.conn.lock().await;
        query_translations(&conn, food_id)
    }

    async fn measurements(&self, food_id: i64) -> StoreResult<Vec<MeasurementRow>> {
        let conn = self.conn.lock().await;
        query_measurements(&conn, food_id)
    }

    async fn langual_codes(&self, food_id: i64) -> StoreResult<Vec<LangualRow>> {
        let conn = self.conn.lock().await;
        query_langual_codes(&conn, food_id)
    }

    async fn references(&self, codes: &[i64]) -> StoreResult<Vec<ReferenceRow>> {
        if codes.is_empty() {
            return Err(StoreError::EmptyKeySet);
        }
        let conn = self.conn.lock().await;
        query_references(&conn, codes)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Create tables if needed and check the stored schema version.
fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(CREATE_SCHEMA)?;

    let stored_version: Option<String> = conn
        .query_row(SELECT_SCHEMA_VERSION, [], |row| row.get(0))
        .optional()?;

    match stored_version {
        None => {
            conn.execute(INSERT_SCHEMA_VERSION, params![SCHEMA_VERSION.to_string()])?;
        }
        Some(v) => {
            let found: i32 = v.parse().unwrap_or(0);
            if found != SCHEMA_VERSION {
                return Err(StoreError::SchemaVersion {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }
    }

    Ok(())
}

// ============================================================================
// Queries
// ============================================================================

fn query_food(conn: &Connection, key: &FoodKey) -> StoreResult<Option<FoodRow>> {
    let food = match key {
        FoodKey::Id(id) => conn.query_row(&food_by_id_query(), params![id], food_from_row),
        FoodKey::Code(code) => conn.query_row(&food_by_code_query(), params![code], food_from_row),
    }
    .optional()?;

    if food.is_none() {
        debug!(key = %key, "no food row");
    }
    Ok(food)
}

fn food_from_row(row: &Row<'_>) -> rusqlite::Result<FoodRow> {
    Ok(FoodRow {
        id: row.get(0)?,
        code: row.get(1)?,
        strain: row.get(2)?,
        brand: row.get(3)?,
        observation: row.get(4)?,
        group_code: row.get(5)?,
        group_name: row.get(6)?,
        type_code: row.get(7)?,
        type_name: row.get(8)?,
        scientific_name: row.get(9)?,
        subspecies: row.get(10)?,
    })
}

fn query_translations(conn: &Connection, food_id: i64) -> StoreResult<Vec<TranslationRow>> {
    let mut stmt = conn.prepare(SELECT_TRANSLATIONS)?;
    let rows = stmt
        .query_map(params![food_id], |row| {
            Ok(TranslationRow {
                language_code: row.get(0)?,
                common_name: row.get(1)?,
                ingredients: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Measurements with their reference codes folded back into one row each.
fn query_measurements(conn: &Connection, food_id: i64) -> StoreResult<Vec<MeasurementRow>> {
    let mut stmt = conn.prepare(SELECT_MEASUREMENTS)?;
    let mut rows = stmt.query(params![food_id])?;
    let mut measurements: IndexMap<i64, MeasurementRow> = IndexMap::new();

    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let reference_code: Option<i64> = row.get(15)?;

        let measurement = match measurements.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(measurement_from_row(row)?),
        };
        if let Some(code) = reference_code {
            measurement.reference_codes.push(code);
        }
    }

    Ok(measurements.into_values().collect())
}

fn measurement_from_row(row: &Row<'_>) -> rusqlite::Result<MeasurementRow> {
    Ok(MeasurementRow {
        id: row.get(0)?,
        nutrient_id: row.get(1)?,
        name: row.get(2)?,
        nutrient_type: row.get(3)?,
        macronutrient_id: row.get(4)?,
        micronutrient_type: row.get(5)?,
        measurement_unit: row.get(6)?,
        average: row.get(7)?,
        deviation: row.get(8)?,
        min: row.get(9)?,
        max: row.get(10)?,
        sample_size: row.get(11)?,
        standardized: row.get(12)?,
        data_type: row.get(13)?,
        note: row.get(14)?,
        reference_codes: Vec::new(),
    })
}

fn query_langual_codes(conn: &Connection, food_id: i64) -> StoreResult<Vec<LangualRow>> {
    let mut stmt = conn.prepare(SELECT_LANGUAL_CODES)?;
    let rows = stmt
        .query_map(params![food_id], |row| {
            Ok(LangualRow {
                code: row.get(0)?,
                descriptor: row.get(1)?,
                parent_code: row.get(2)?,
                parent_descriptor: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// References with their authors folded back into one row each, in
/// author position order.
fn query_references(conn: &Connection, codes: &[i64]) -> StoreResult<Vec<ReferenceRow>> {
    let sql = references_query(codes.len());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(codes.iter()))?;
    let mut references: IndexMap<i64, ReferenceRow> = IndexMap::new();

    while let Some(row) = rows.next()? {
        let code: i64 = row.get(0)?;
        let author: Option<String> = row.get(12)?;

        let reference = match references.entry(code) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(reference_from_row(row)?),
        };
        if let Some(author) = author {
            reference.authors.push(author);
        }
    }

    Ok(references.into_values().collect())
}

fn reference_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceRow> {
    Ok(ReferenceRow {
        code: row.get(0)?,
        title: row.get(1)?,
        reference_type: row.get(2)?,
        authors: Vec::new(),
        other: row.get(3)?,
        year: row.get(4)?,
        city_name: row.get(5)?,
        page_start: row.get(6)?,
        page_end: row.get(7)?,
        volume: row.get(8)?,
        issue: row.get(9)?,
        volume_year: row.get(10)?,
        journal_name: row.get(11)?,
    })
}

// ============================================================================
// Seeding
// ============================================================================

fn write_seed(conn: &Connection, seed: &Seed) -> StoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for group in &seed.food_groups {
        conn.execute(INSERT_FOOD_GROUP, params![group.code, group.name])?;
    }
    for food_type in &seed.food_types {
        conn.execute(INSERT_FOOD_TYPE, params![food_type.code, food_type.name])?;
    }
    for language in &seed.languages {
        conn.execute(INSERT_LANGUAGE, params![language.code, language.name])?;
    }

    for nutrient in &seed.nutrients {
        conn.execute(
            INSERT_NUTRIENT,
            params![
                nutrient.id,
                nutrient.name,
                nutrient.nutrient_type,
                nutrient.measurement_unit,
                nutrient.standardized,
                nutrient.note
            ],
        )?;
        if let Some(macronutrient_id) = nutrient.macronutrient_id {
            conn.execute(INSERT_NUTRIENT_COMPONENT, params![nutrient.id, macronutrient_id])?;
        }
        if let Some(kind) = &nutrient.micronutrient_type {
            conn.execute(INSERT_MICRONUTRIENT, params![nutrient.id, kind])?;
        }
        summary.nutrients += 1;
    }

    // Parents may be listed after their children, so link in a second pass
    let known: HashSet<&str> = seed.langual_codes.iter().map(|c| c.code.as_str()).collect();
    for langual in &seed.langual_codes {
        conn.execute(INSERT_LANGUAL_CODE, params![langual.code, langual.descriptor])?;
        summary.langual_codes += 1;
    }
    for langual in &seed.langual_codes {
        if let Some(parent) = &langual.parent_code {
            if !known.contains(parent.as_str()) {
                return Err(StoreError::InvalidSeed(format!(
                    "LanguaL code '{}' has unknown parent '{}'",
                    langual.code, parent
                )));
            }
            conn.execute(UPDATE_LANGUAL_PARENT, params![parent, langual.code])?;
        }
    }

    for reference in &seed.references {
        if let Some(city) = &reference.city_name {
            conn.execute(INSERT_CITY, params![city])?;
        }
        if let Some(journal) = &reference.journal_name {
            conn.execute(INSERT_JOURNAL, params![journal])?;
        }
        conn.execute(
            INSERT_REFERENCE,
            params![
                reference.code,
                reference.title,
                reference.reference_type,
                reference.other,
                reference.year,
                reference.city_name,
                reference.page_start,
                reference.page_end,
                reference.volume,
                reference.issue,
                reference.volume_year,
                reference.journal_name
            ],
        )?;
        for (position, author) in reference.authors.iter().enumerate() {
            conn.execute(INSERT_AUTHOR, params![author])?;
            conn.execute(
                INSERT_REFERENCE_AUTHOR,
                params![reference.code, author, position as i64],
            )?;
        }
        summary.references += 1;
    }

    for food in &seed.foods {
        // An all-digit code would be unreachable, read as a numeric id
        if !FoodKey::is_valid_code(&food.code) {
            return Err(StoreError::InvalidSeed(format!(
                "food {} has malformed code '{}'",
                food.id, food.code
            )));
        }

        conn.execute(
            INSERT_FOOD,
            params![
                food.id,
                food.code,
                food.strain,
                food.brand,
                food.observation,
                food.group_code,
                food.type_code,
                food.scientific_name,
                food.subspecies
            ],
        )?;

        for translation in &food.translations {
            conn.execute(
                INSERT_TRANSLATION,
                params![
                    food.id,
                    translation.language_code,
                    translation.common_name,
                    translation.ingredients
                ],
            )?;
        }

        for measurement in &food.measurements {
            conn.execute(
                INSERT_MEASUREMENT,
                params![
                    food.id,
                    measurement.nutrient_id,
                    measurement.average,
                    measurement.deviation,
                    measurement.min,
                    measurement.max,
                    measurement.sample_size,
                    measurement.data_type
                ],
            )?;
            let measurement_id = conn.last_insert_rowid();
            for code in &measurement.reference_codes {
                conn.execute(INSERT_MEASUREMENT_REFERENCE, params![measurement_id, code])?;
            }
            summary.measurements += 1;
        }

        for code in &food.langual_codes {
            conn.execute(INSERT_FOOD_LANGUAL_CODE, params![food.id, code])?;
        }

        summary.foods += 1;
    }

    Ok(summary)
}
