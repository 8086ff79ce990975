use std::collections::HashMap;
use std::sync::Arc;

use super::row::RowRecord;
use crate::types::RowValues;

/// A result set from a database query: the materialized rows plus the
/// statement's post-execute column metadata, shared by all rows.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query, in engine order
    pub results: Vec<RowRecord>,
    /// The number of rows materialized
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index_cache: None,
        }
    }

    /// Set the column names for this result set (shared by all rows added
    /// through [`ResultSet::add_row_values`]).
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        self.column_names = Some(column_names);
        self.column_index_cache = Some(cache);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row by positional values, zipped against the shared column
    /// names. Rows added before `set_column_names` are dropped.
    pub fn add_row_values(&mut self, values: Vec<RowValues>) {
        if let (Some(column_names), Some(cache)) =
            (&self.column_names, &self.column_index_cache)
        {
            let row = RowRecord::from_shared(
                Arc::clone(column_names),
                Arc::clone(cache),
                values,
            );
            self.results.push(row);
            self.rows_affected += 1;
        }
    }

    /// Add a pre-built row. If column names haven't been set yet, this row's
    /// names become the set's.
    pub fn add_row(&mut self, row: RowRecord) {
        if self.column_names.is_none() {
            self.set_column_names(Arc::new(row.columns().to_vec()));
        }

        self.results.push(row);
        self.rows_affected += 1;
    }
}
