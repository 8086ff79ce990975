use super::{Session, Statement};
use crate::driver::SqlDriver;
use crate::error::MysqlSessionError;
use crate::query_builder::{build_insert, build_update};
use crate::results::RowRecord;
use crate::types::RowValues;

impl<D: SqlDriver> Session<D> {
    /// Insert one or many records into `table`, then commit.
    ///
    /// All records must share one column set (order-independent); the column
    /// list is canonicalized lexicographically so value tuples line up with
    /// the generated column list no matter how each record was built. One
    /// record becomes a single execute, several become one batch execute.
    ///
    /// With `upsert_columns`, a uniqueness conflict updates only the named
    /// columns from the incoming values instead of failing the insert.
    ///
    /// # Errors
    /// `MysqlSessionError::SchemaMismatch` if `rows` is empty or the records
    /// disagree on columns, detected before any SQL is issued. Otherwise
    /// the execute/commit failure surface.
    pub async fn insert_rows(
        &mut self,
        table: &str,
        rows: &[RowRecord],
        upsert_columns: Option<&[&str]>,
    ) -> Result<(), MysqlSessionError> {
        let Some(first) = rows.first() else {
            return Err(MysqlSessionError::SchemaMismatch(
                "no rows to insert".to_string(),
            ));
        };

        let expected_keys = first.key_set();
        for row in &rows[1..] {
            if row.key_set() != expected_keys {
                return Err(MysqlSessionError::SchemaMismatch(format!(
                    "rows disagree on columns: {:?} vs {:?}",
                    expected_keys,
                    row.key_set()
                )));
            }
        }

        // Canonical column order, independent of per-record insertion order.
        let mut columns: Vec<String> = first.columns().to_vec();
        columns.sort();

        let value_rows: Vec<Vec<RowValues>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).cloned().unwrap_or(RowValues::Null))
                    .collect()
            })
            .collect();

        let upsert = upsert_columns.filter(|columns| !columns.is_empty());
        let sql = build_insert(table, &columns, upsert);

        if let [row] = value_rows.as_slice() {
            self.execute_with_retry(Statement::Single {
                sql: &sql,
                params: row,
            })
            .await?;
        } else {
            self.execute_with_retry(Statement::Batch {
                sql: &sql,
                rows: &value_rows,
            })
            .await?;
        }

        self.commit().await
    }

    /// Update the row identified by `id_column = id_value`, then commit.
    /// `id_column` is assumed to identify at most one row; the affected-row
    /// count is not verified.
    ///
    /// # Errors
    /// `MysqlSessionError::ExecutionError` when `fields` is empty; otherwise
    /// the execute/commit failure surface.
    pub async fn update_row(
        &mut self,
        table: &str,
        id_column: &str,
        id_value: RowValues,
        fields: &[(&str, RowValues)],
    ) -> Result<(), MysqlSessionError> {
        if fields.is_empty() {
            return Err(MysqlSessionError::ExecutionError(
                "update requires at least one field".to_string(),
            ));
        }

        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        let sql = build_update(table, &columns, id_column);

        let mut params: Vec<RowValues> = fields.iter().map(|(_, value)| value.clone()).collect();
        params.push(id_value);

        self.execute_with_retry(Statement::Single {
            sql: &sql,
            params: &params,
        })
        .await?;

        self.commit().await
    }
}
