//! Driver adapter over `mysql_async`.

mod params;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder, Params};
use tracing::debug;

use crate::config::SessionConfig;
use crate::driver::{ConnectTarget, DriverConnection, DriverFault, SqlDriver};
use crate::environment::EnvironmentResolver;
use crate::error::MysqlSessionError;
use crate::session::Session;
use crate::types::RowValues;

pub use params::{from_mysql_value, to_mysql_value};

/// A [`Session`] wired to the MySQL adapter.
pub type MysqlSession = Session<MysqlDriver>;

impl MysqlSession {
    /// Open a session against MySQL with the default driver adapter.
    ///
    /// # Errors
    /// Returns `MysqlSessionError::ConnectionError` if the connection cannot
    /// be established, or `ConfigError` for missing environment fields.
    pub async fn open_mysql(
        config: SessionConfig,
        resolver: Arc<dyn EnvironmentResolver>,
    ) -> Result<Self, MysqlSessionError> {
        Session::open(MysqlDriver, config, resolver).await
    }
}

/// Connection factory backed by `mysql_async`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDriver;

#[async_trait]
impl SqlDriver for MysqlDriver {
    type Conn = MysqlConnection;

    async fn connect(&self, target: &ConnectTarget) -> Result<MysqlConnection, MysqlSessionError> {
        let opts = build_opts(target);
        let conn = Conn::new(opts).await.map_err(|e| {
            MysqlSessionError::ConnectionError(format!("MySQL connection error: {e}"))
        })?;
        Ok(MysqlConnection {
            conn: Some(conn),
            columns: Vec::new(),
            buffered: VecDeque::new(),
        })
    }
}

fn build_opts(target: &ConnectTarget) -> Opts {
    // Fixed session setup on every connect: UTF-8 and explicit commits.
    let setup = vec![
        "SET NAMES utf8mb4".to_string(),
        "SET autocommit = 0".to_string(),
    ];
    let builder = match target {
        ConnectTarget::Tcp {
            host,
            port,
            database,
            user,
            password,
        } => OptsBuilder::default()
            .ip_or_hostname(host.clone())
            .tcp_port(*port)
            .db_name(Some(database.clone()))
            .user(Some(user.clone()))
            .pass(password.clone()),
        ConnectTarget::Socket {
            path,
            database,
            user,
        } => OptsBuilder::default()
            .socket(Some(path.clone()))
            .db_name(Some(database.clone()))
            .user(Some(user.clone())),
    };
    Opts::from(builder.setup(setup))
}

/// One live `mysql_async` connection plus the buffered result of its most
/// recent execute.
pub struct MysqlConnection {
    conn: Option<Conn>,
    columns: Vec<String>,
    buffered: VecDeque<Vec<RowValues>>,
}

impl MysqlConnection {
    fn conn_mut(&mut self) -> Result<&mut Conn, DriverFault> {
        self.conn
            .as_mut()
            .ok_or_else(|| DriverFault::transient("connection already closed"))
    }
}

fn to_params(params: &[RowValues]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql_value).collect())
    }
}

fn row_values(row: mysql_async::Row) -> Vec<RowValues> {
    (0..row.len())
        .map(|i| {
            let value: mysql_async::Value = row.get(i).unwrap_or(mysql_async::Value::NULL);
            from_mysql_value(value)
        })
        .collect()
}

/// Classify an underlying client error as recoverable (eligible for
/// reconnect-and-retry) or not. Socket-level faults and the server's
/// transient codes are recoverable; constraint, syntax, and type errors are
/// not.
fn is_recoverable(error: &mysql_async::Error) -> bool {
    match error {
        mysql_async::Error::Io(_) => true,
        mysql_async::Error::Driver(driver_error) => matches!(
            driver_error,
            mysql_async::DriverError::ConnectionClosed
                | mysql_async::DriverError::PoolDisconnected
        ),
        // 1205 lock wait timeout, 1213 deadlock, 2006 server gone,
        // 2013 lost connection during query
        mysql_async::Error::Server(server_error) => {
            matches!(server_error.code, 1205 | 1213 | 2006 | 2013)
        }
        _ => false,
    }
}

fn map_fault(context: &str, error: mysql_async::Error) -> DriverFault {
    let message = format!("{context}: {error}");
    let fault = if is_recoverable(&error) {
        DriverFault::transient(message)
    } else {
        DriverFault::fatal(message)
    };
    fault.with_source(error)
}

#[async_trait]
impl DriverConnection for MysqlConnection {
    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<(), DriverFault> {
        let converted = to_params(params);
        let conn = self.conn_mut()?;
        let mut result = conn
            .exec_iter(sql, converted)
            .await
            .map_err(|e| map_fault("execute", e))?;
        let columns: Vec<String> = result
            .columns()
            .map(|cols| cols.iter().map(|c| c.name_str().to_string()).collect())
            .unwrap_or_default();
        let rows: Vec<mysql_async::Row> = result
            .collect()
            .await
            .map_err(|e| map_fault("fetch", e))?;
        drop(result);

        self.columns = columns;
        self.buffered = rows.into_iter().map(row_values).collect();
        Ok(())
    }

    async fn execute_batch(
        &mut self,
        sql: &str,
        rows: &[Vec<RowValues>],
    ) -> Result<(), DriverFault> {
        let param_sets: Vec<Params> = rows.iter().map(|row| to_params(row)).collect();
        let conn = self.conn_mut()?;
        conn.exec_batch(sql, param_sets)
            .await
            .map_err(|e| map_fault("batch execute", e))?;
        self.columns.clear();
        self.buffered.clear();
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
        let conn = self.conn_mut()?;
        conn.query_drop("COMMIT")
            .await
            .map_err(|e| map_fault("commit", e))
    }

    async fn rollback(&mut self) -> Result<(), DriverFault> {
        let conn = self.conn_mut()?;
        conn.query_drop("ROLLBACK")
            .await
            .map_err(|e| map_fault("rollback", e))
    }

    async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(error) = conn.disconnect().await {
                debug!(%error, "error while disconnecting, ignored");
            }
        }
    }
}
