//! The session layer: one logical caller, one physical connection.

mod dml;
mod executor;
mod query;
mod tx;

pub use executor::Statement;

use std::sync::Arc;

use tracing::debug;

use crate::config::{RetryPolicy, SessionConfig};
use crate::driver::{DriverConnection, SqlDriver};
use crate::environment::EnvironmentResolver;
use crate::error::MysqlSessionError;

/// One database session: a driver, the connection configuration, the retry
/// policy, and zero-or-one live connection.
///
/// Every operation takes `&mut self`, so two operations on one session can
/// never overlap; the cursor underneath is not reentrant. Sessions are
/// cheap; open one per unit of work and [`Session::close`] it when done
/// (dropping the session tears the socket down as well, but an explicit
/// close lets the server see a clean disconnect).
pub struct Session<D: SqlDriver> {
    driver: D,
    config: SessionConfig,
    resolver: Arc<dyn EnvironmentResolver>,
    retry: RetryPolicy,
    conn: Option<D::Conn>,
    last_statement: Option<String>,
}

impl<D: SqlDriver> Session<D> {
    /// Create a session without connecting; the first operation connects on
    /// demand.
    #[must_use]
    pub fn new(driver: D, config: SessionConfig, resolver: Arc<dyn EnvironmentResolver>) -> Self {
        Self {
            driver,
            config,
            resolver,
            retry: RetryPolicy::default(),
            conn: None,
            last_statement: None,
        }
    }

    /// Create a session and connect eagerly.
    ///
    /// # Errors
    /// Returns `MysqlSessionError::ConnectionError` if the connection cannot
    /// be established, or `ConfigError` if the resolved environment's
    /// required fields are missing.
    pub async fn open(
        driver: D,
        config: SessionConfig,
        resolver: Arc<dyn EnvironmentResolver>,
    ) -> Result<Self, MysqlSessionError> {
        let mut session = Self::new(driver, config, resolver);
        session.connect().await?;
        Ok(session)
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn resolver(&self) -> &dyn EnvironmentResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn last_statement(&self) -> Option<&str> {
        self.last_statement.as_deref()
    }

    pub(crate) fn record_statement(&mut self, sql: &str) {
        self.last_statement = Some(sql.to_string());
    }

    /// Establish a fresh connection, replacing (and closing) any previous
    /// one. The old cursor state goes with the old connection; callers can
    /// never observe a half-replaced pair.
    ///
    /// # Errors
    /// `ConfigError` when the resolved environment's fields are missing,
    /// `ConnectionError` when the driver cannot connect.
    pub async fn connect(&mut self) -> Result<(), MysqlSessionError> {
        let environment = self.resolver.classify();
        let application_id = self.resolver.application_id();
        let target = self
            .config
            .connect_target(environment, application_id.as_deref())?;
        debug!(?environment, db = %self.config.db_name, "establishing database connection");
        let conn = self.driver.connect(&target).await?;
        if let Some(mut previous) = self.conn.replace(conn) {
            previous.close().await;
        }
        Ok(())
    }

    /// Release the physical connection. Idempotent; closing a session that
    /// never connected (or is already closed) is a no-op.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close().await;
            debug!(db = %self.config.db_name, "database connection closed");
        }
    }

    /// Drop the current connection without a replacement, leaving the
    /// session disconnected until the next connect.
    pub(crate) async fn discard_connection(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close().await;
        }
    }

    /// The live connection, connecting on demand if none exists.
    pub(crate) async fn conn_mut(&mut self) -> Result<&mut D::Conn, MysqlSessionError> {
        if self.conn.is_none() {
            self.connect().await?;
        }
        self.conn.as_mut().ok_or_else(|| {
            MysqlSessionError::ConnectionError("no live connection".to_string())
        })
    }
}
