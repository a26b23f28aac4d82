//! Optional-field projection.
//!
//! Optional attributes are modelled as `Option` and skipped by serde when
//! `None`. Projection is the step that decides *which* values count as
//! absent: for text, `None`, empty and whitespace-only strings; for numbers,
//! only `None` (a zero average or year is a real value).

use crate::model::{Citation, FoodRow, ReferenceRow};

/// Normalizes the optional fields of a record before serialization.
pub trait Project {
    fn project(self) -> Self;
}

/// Trim an optional text value, collapsing blank strings to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl Project for FoodRow {
    fn project(self) -> Self {
        Self {
            strain: optional_text(self.strain),
            brand: optional_text(self.brand),
            observation: optional_text(self.observation),
            scientific_name: optional_text(self.scientific_name),
            subspecies: optional_text(self.subspecies),
            ..self
        }
    }
}

impl Project for Citation {
    fn project(self) -> Self {
        Self {
            other: optional_text(self.other),
            city_name: optional_text(self.city_name),
            journal_name: optional_text(self.journal_name),
            ..self
        }
    }
}

impl From<ReferenceRow> for Citation {
    fn from(row: ReferenceRow) -> Self {
        Citation {
            code: row.code,
            title: row.title,
            reference_type: row.reference_type,
            authors: row.authors,
            other: row.other,
            year: row.year,
            city_name: row.city_name,
            page_start: row.page_start,
            page_end: row.page_end,
            volume: row.volume,
            issue: row.issue,
            volume_year: row.volume_year,
            journal_name: row.journal_name,
        }
    }
}
