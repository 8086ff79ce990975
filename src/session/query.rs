use std::sync::Arc;

use super::{Session, Statement};
use crate::driver::{DriverConnection, SqlDriver};
use crate::error::MysqlSessionError;
use crate::query_builder::{
    SelectOptions, build_drop_table, build_select_where, build_show_columns,
};
use crate::results::ResultSet;
use crate::types::RowValues;

impl<D: SqlDriver> Session<D> {
    /// Run a general-purpose query and return raw positional rows: all of
    /// them, or at most `limit` if given.
    ///
    /// # Errors
    /// Returns an error if execution fails past the retry policy (see
    /// [`Session::execute_with_retry`]) or fetching the rows fails.
    pub async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
        limit: Option<usize>,
    ) -> Result<Vec<Vec<RowValues>>, MysqlSessionError> {
        self.execute_with_retry(Statement::Single { sql, params })
            .await?;
        let conn = self.conn_mut().await?;
        let rows = match limit {
            Some(n) => conn.fetch_many(n).await?,
            None => conn.fetch_all().await?,
        };
        Ok(rows)
    }

    /// Run a query and materialize each row as a [`crate::RowRecord`],
    /// zipping the statement's result column names with the positional
    /// values. Row order and engine column order are preserved.
    ///
    /// ```rust,ignore
    /// let heroes = session
    ///     .select_query("SELECT * FROM heroes WHERE age > ?", &[RowValues::Int(18)], None)
    ///     .await?;
    /// for row in &heroes.results {
    ///     println!("{:?}", row.get("name"));
    /// }
    /// ```
    ///
    /// # Errors
    /// Same failure surface as [`Session::query`].
    pub async fn select_query(
        &mut self,
        sql: &str,
        params: &[RowValues],
        limit: Option<usize>,
    ) -> Result<ResultSet, MysqlSessionError> {
        self.execute_with_retry(Statement::Single { sql, params })
            .await?;
        let conn = self.conn_mut().await?;
        let column_names = Arc::new(conn.column_names().to_vec());
        let rows = match limit {
            Some(n) => conn.fetch_many(n).await?,
            None => conn.fetch_all().await?,
        };

        let mut result_set = ResultSet::with_capacity(rows.len());
        result_set.set_column_names(column_names);
        for values in rows {
            result_set.add_row_values(values);
        }
        Ok(result_set)
    }

    /// Whole-row select with equality filters. Restricted but convenient:
    /// builds `SELECT * FROM t WHERE k = ? AND ...` with the filter values
    /// bound as parameters. Filter keys, the table name, and the order-by
    /// column are interpolated as trusted identifiers.
    ///
    /// # Errors
    /// Same failure surface as [`Session::query`].
    pub async fn select_where(
        &mut self,
        table: &str,
        filters: &[(&str, RowValues)],
        opts: &SelectOptions,
    ) -> Result<ResultSet, MysqlSessionError> {
        let columns: Vec<&str> = filters.iter().map(|(column, _)| *column).collect();
        let params: Vec<RowValues> = filters.iter().map(|(_, value)| value.clone()).collect();
        let sql = build_select_where(table, &columns, opts);
        self.select_query(&sql, &params, None).await
    }

    /// The first column of the first result row, or `None` if the query
    /// matched nothing. A NULL first column comes back as
    /// `Some(RowValues::Null)`; absent and null stay distinguishable.
    ///
    /// # Errors
    /// Same failure surface as [`Session::query`].
    pub async fn select_scalar(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<RowValues>, MysqlSessionError> {
        self.execute_with_retry(Statement::Single { sql, params })
            .await?;
        let conn = self.conn_mut().await?;
        match conn.fetch_one().await? {
            None => Ok(None),
            Some(values) => {
                let first = values.into_iter().next().ok_or_else(|| {
                    MysqlSessionError::ExecutionError(
                        "scalar query returned a zero-column row".to_string(),
                    )
                })?;
                Ok(Some(first))
            }
        }
    }

    /// Names of `table`'s columns, engine-declared order preserved.
    ///
    /// # Errors
    /// Same failure surface as [`Session::query`], plus `ExecutionError` if
    /// the engine returns an unexpected metadata shape.
    pub async fn table_columns(&mut self, table: &str) -> Result<Vec<String>, MysqlSessionError> {
        let sql = build_show_columns(table);
        let rows = self.query(&sql, &[], None).await?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_iter().next() {
                Some(RowValues::Text(name)) => names.push(name),
                other => {
                    return Err(MysqlSessionError::ExecutionError(format!(
                        "unexpected column metadata value: {other:?}"
                    )));
                }
            }
        }
        Ok(names)
    }

    /// Drop each listed table if present and re-create it from its
    /// definition. Gated to non-production environments: anywhere else this
    /// refuses up front and touches nothing.
    ///
    /// # Errors
    /// `MysqlSessionError::UnsafeOperation` outside local/CI environments;
    /// otherwise the usual execution failure surface.
    pub async fn reset_tables(
        &mut self,
        definitions: &[(&str, &str)],
    ) -> Result<(), MysqlSessionError> {
        let environment = self.resolver().classify();
        if !environment.allows_destructive_ops() {
            return Err(MysqlSessionError::UnsafeOperation(format!(
                "table reset refused in {environment:?} environment"
            )));
        }

        for (table, create_statement) in definitions.iter().copied() {
            let drop_statement = build_drop_table(table);
            self.execute_with_retry(Statement::Single {
                sql: &drop_statement,
                params: &[],
            })
            .await?;
            self.execute_with_retry(Statement::Single {
                sql: create_statement,
                params: &[],
            })
            .await?;
        }
        Ok(())
    }
}
