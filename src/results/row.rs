use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::types::RowValues;

/// One table row: an ordered mapping from column name to scalar value.
///
/// Serves both directions: select results hand these out (column names
/// shared across the whole result set), and insert/update operations take
/// them as input.
#[derive(Debug, Clone)]
pub struct RowRecord {
    /// The column names for this row (shared across all rows in a result set)
    column_names: Arc<Vec<String>>,
    /// The values for this row, positionally aligned with `column_names`
    values: Vec<RowValues>,
    // Cache of column name to index, to avoid repeated string comparisons
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl RowRecord {
    /// Build a row from shared column names and positional values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    /// Build a row from `(column, value)` pairs, preserving their order.
    #[must_use]
    pub fn from_pairs<N: Into<String>>(pairs: Vec<(N, RowValues)>) -> Self {
        let mut names = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            names.push(name.into());
            values.push(value);
        }
        Self::new(Arc::new(names), values)
    }

    pub(crate) fn from_shared(
        column_names: Arc<Vec<String>>,
        column_index_cache: Arc<HashMap<String, usize>>,
        values: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the index of a column by name, or None if not found.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by column name, or None if the column wasn't found.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index, or None if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// The row's column names as an order-independent set.
    pub(crate) fn key_set(&self) -> BTreeSet<&str> {
        self.column_names.iter().map(String::as_str).collect()
    }
}

impl PartialEq for RowRecord {
    fn eq(&self, other: &Self) -> bool {
        *self.column_names == *other.column_names && self.values == other.values
    }
}
