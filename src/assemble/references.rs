//! Reference-code collection and citation resolution.
//!
//! Collection happens during the nutrient pass; resolution happens after the
//! caller has bulk-fetched the references for the collected codes.

use std::collections::BTreeSet;

use super::projection::Project;
use crate::model::{Citation, ReferenceRow};

/// Request-scoped set of reference codes cited by a food's measurements.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCollector {
    codes: BTreeSet<i64>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the codes cited by one measurement. Duplicates collapse.
    pub fn collect(&mut self, codes: &[i64]) {
        self.codes.extend(codes.iter().copied());
    }

    /// The collected codes in ascending order.
    pub fn codes(&self) -> Vec<i64> {
        self.codes.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Map fetched reference rows to citations, keeping the fetch order.
    pub fn resolve(&self, rows: Vec<ReferenceRow>) -> Vec<Citation> {
        rows.into_iter()
            .map(|row| Citation::from(row).project())
            .collect()
    }

    /// Fetch and resolve in one step.
    ///
    /// `fetch` is never called with an empty key set; an empty collector
    /// resolves to an empty list directly.
    pub fn resolve_with<F, E>(&self, fetch: F) -> Result<Vec<Citation>, E>
    where
        F: FnOnce(&[i64]) -> Result<Vec<ReferenceRow>, E>,
    {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch(&self.codes())?;
        Ok(self.resolve(rows))
    }
}
