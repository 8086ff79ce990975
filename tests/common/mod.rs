#![allow(dead_code)]

//! Scripted driver for exercising the session layer without a server.
//!
//! Faults are queued per call site and consumed in order; successful
//! statements are logged with their bound parameters. INSERTs feed a tiny
//! in-memory table so select-after-insert round trips work.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mysql_session::{
    ConnectTarget, DriverConnection, DriverFault, MysqlSessionError, RowValues, SqlDriver,
};

/// Result set served for the next successful execute.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RowValues>>,
}

#[derive(Default)]
pub struct DriverState {
    pub execute_faults: VecDeque<DriverFault>,
    pub commit_faults: VecDeque<DriverFault>,
    pub scripted_results: VecDeque<ScriptedResult>,
    /// Successful statements, in issue order.
    pub executed: Vec<String>,
    /// Parameter tuples per successful execute (one tuple for single
    /// statements, one per row for batches).
    pub executed_params: Vec<Vec<Vec<RowValues>>>,
    /// Every execute invocation, including ones answered with a fault.
    pub attempts: usize,
    pub connects: usize,
    pub closes: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub refuse_connect: bool,
    /// In-memory single-table store: canonical columns plus rows.
    pub table: Option<(Vec<String>, Vec<Vec<RowValues>>)>,
}

#[derive(Clone, Default)]
pub struct ScriptedDriver {
    pub state: Arc<Mutex<DriverState>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_transient(&self, message: &str) {
        self.lock().execute_faults.push_back(DriverFault::transient(message));
    }

    pub fn push_fatal(&self, message: &str) {
        self.lock().execute_faults.push_back(DriverFault::fatal(message));
    }

    pub fn push_commit_fault(&self, message: &str) {
        self.lock().commit_faults.push_back(DriverFault::fatal(message));
    }

    pub fn push_result(&self, columns: &[&str], rows: Vec<Vec<RowValues>>) {
        self.lock().scripted_results.push_back(ScriptedResult {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
        });
    }

    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    pub fn executed(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    pub fn executed_params(&self) -> Vec<Vec<Vec<RowValues>>> {
        self.lock().executed_params.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DriverState> {
        self.state.lock().expect("driver state poisoned")
    }
}

#[async_trait]
impl SqlDriver for ScriptedDriver {
    type Conn = ScriptedConnection;

    async fn connect(&self, _target: &ConnectTarget) -> Result<ScriptedConnection, MysqlSessionError> {
        let mut state = self.lock();
        if state.refuse_connect {
            return Err(MysqlSessionError::ConnectionError(
                "scripted connection refusal".to_string(),
            ));
        }
        state.connects += 1;
        Ok(ScriptedConnection {
            state: Arc::clone(&self.state),
            columns: Vec::new(),
            buffered: VecDeque::new(),
        })
    }
}

pub struct ScriptedConnection {
    state: Arc<Mutex<DriverState>>,
    columns: Vec<String>,
    buffered: VecDeque<Vec<RowValues>>,
}

/// Column list of an INSERT statement, e.g. `INSERT INTO t (a, b) ...`.
fn insert_columns(sql: &str) -> Option<Vec<String>> {
    if !sql.starts_with("INSERT INTO ") {
        return None;
    }
    let open = sql.find('(')?;
    let close = sql.find(')')?;
    Some(
        sql[open + 1..close]
            .split(", ")
            .map(|column| column.trim_matches('`').to_string())
            .collect(),
    )
}

/// Filter columns of a generated `SELECT * FROM t WHERE ...` statement.
fn where_filters(sql: &str) -> Vec<String> {
    let Some(start) = sql.find(" WHERE ") else {
        return Vec::new();
    };
    let clause = &sql[start + " WHERE ".len()..];
    let end = clause
        .find(" ORDER BY")
        .or_else(|| clause.find(" LIMIT"))
        .unwrap_or(clause.len());
    let clause = &clause[..end];
    if clause == "1" {
        return Vec::new();
    }
    clause
        .split(" AND ")
        .filter_map(|term| term.strip_suffix(" = ?"))
        .map(|column| column.trim_matches('`').to_string())
        .collect()
}

impl ScriptedConnection {
    fn record_success(
        state: &mut DriverState,
        sql: &str,
        param_sets: Vec<Vec<RowValues>>,
    ) {
        state.executed.push(sql.to_string());
        state.executed_params.push(param_sets);
    }

    fn result_for(state: &mut DriverState, sql: &str, params: &[RowValues]) -> ScriptedResult {
        if let Some(result) = state.scripted_results.pop_front() {
            return result;
        }
        if sql.starts_with("SELECT * FROM ") {
            if let Some((columns, rows)) = state.table.clone() {
                let filters = where_filters(sql);
                let kept = rows
                    .into_iter()
                    .filter(|row| {
                        filters.iter().zip(params.iter()).all(|(column, expected)| {
                            columns
                                .iter()
                                .position(|c| c == column)
                                .is_some_and(|i| row.get(i) == Some(expected))
                        })
                    })
                    .collect();
                return ScriptedResult {
                    columns,
                    rows: kept,
                };
            }
        }
        ScriptedResult::default()
    }

    fn store_rows(state: &mut DriverState, columns: Vec<String>, rows: &[Vec<RowValues>]) {
        let table = state.table.get_or_insert_with(|| (columns.clone(), Vec::new()));
        table.1.extend(rows.iter().cloned());
    }
}

#[async_trait]
impl DriverConnection for ScriptedConnection {
    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<(), DriverFault> {
        let mut state = self.state.lock().expect("driver state poisoned");
        state.attempts += 1;
        if let Some(fault) = state.execute_faults.pop_front() {
            return Err(fault);
        }
        Self::record_success(&mut state, sql, vec![params.to_vec()]);

        if let Some(columns) = insert_columns(sql) {
            Self::store_rows(&mut state, columns, &[params.to_vec()]);
            self.columns = Vec::new();
            self.buffered = VecDeque::new();
            return Ok(());
        }

        let result = Self::result_for(&mut state, sql, params);
        self.columns = result.columns;
        self.buffered = result.rows.into();
        Ok(())
    }

    async fn execute_batch(
        &mut self,
        sql: &str,
        rows: &[Vec<RowValues>],
    ) -> Result<(), DriverFault> {
        let mut state = self.state.lock().expect("driver state poisoned");
        state.attempts += 1;
        if let Some(fault) = state.execute_faults.pop_front() {
            return Err(fault);
        }
        Self::record_success(&mut state, sql, rows.to_vec());

        if let Some(columns) = insert_columns(sql) {
            Self::store_rows(&mut state, columns, rows);
        }
        self.columns = Vec::new();
        self.buffered = VecDeque::new();
        Ok(())
    }

    async fn fetch_all(&mut self) -> Result<Vec<Vec<RowValues>>, DriverFault> {
        Ok(self.buffered.drain(..).collect())
    }

    async fn fetch_many(&mut self, n: usize) -> Result<Vec<Vec<RowValues>>, DriverFault> {
        let n = n.min(self.buffered.len());
        Ok(self.buffered.drain(..n).collect())
    }

    async fn fetch_one(&mut self) -> Result<Option<Vec<RowValues>>, DriverFault> {
        Ok(self.buffered.pop_front())
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    async fn commit(&mut self) -> Result<(), DriverFault> {
        let mut state = self.state.lock().expect("driver state poisoned");
        if let Some(fault) = state.commit_faults.pop_front() {
            return Err(fault);
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DriverFault> {
        let mut state = self.state.lock().expect("driver state poisoned");
        state.rollbacks += 1;
        Ok(())
    }

    async fn close(&mut self) {
        let mut state = self.state.lock().expect("driver state poisoned");
        state.closes += 1;
    }
}
