//! Driver-adapter contract consumed by [`crate::session::Session`].
//!
//! The session layer never touches a concrete client library; it talks to
//! these traits. The shipped `mysql_async` adapter lives in [`crate::mysql`],
//! and tests substitute scripted implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::MysqlSessionError;
use crate::types::RowValues;

/// Where and how to open one physical connection.
///
/// Exactly one of these is derived from the session config per connect,
/// selected by the environment resolver's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    /// Direct TCP connection to a reachable server.
    Tcp {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: Option<String>,
    },
    /// Unix-domain socket exposed by a managed database proxy. Trust is
    /// established by the socket path itself; there is no password.
    Socket {
        path: String,
        database: String,
        user: String,
    },
}

/// A fault reported by the driver while executing or fetching.
///
/// Recoverability is decided by the adapter when it classifies the underlying
/// client error, so the retry loop stays driver-agnostic: it only inspects
/// the flag, never the source type.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverFault {
    pub message: String,
    pub recoverable: bool,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverFault {
    /// A transient fault: broken/invalid connection state that a fresh
    /// connection is expected to clear. Eligible for reconnect-and-retry.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recoverable: true,
            source: None,
        }
    }

    /// A non-recoverable fault (syntax, constraint, type mismatch, ...).
    /// Propagated immediately, never retried.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recoverable: false,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }
}

/// Factory for physical connections.
#[async_trait]
pub trait SqlDriver: Send + Sync {
    type Conn: DriverConnection;

    /// Establish a connection to `target` with UTF-8 character encoding.
    ///
    /// # Errors
    /// Returns `MysqlSessionError::ConnectionError` if the underlying client
    /// cannot establish a socket or authenticate.
    async fn connect(&self, target: &ConnectTarget) -> Result<Self::Conn, MysqlSessionError>;
}

/// One live physical connection plus its cursor state.
///
/// `execute`/`execute_batch` buffer the statement's result set and its column
/// metadata inside the connection; the `fetch_*` methods and `column_names`
/// read that buffer. Replacing the connection replaces the cursor state with
/// it, so a stale cursor can never outlive its connection.
#[async_trait]
pub trait DriverConnection: Send {
    /// Execute a single statement with positionally bound parameters.
    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<(), DriverFault>;

    /// Execute one statement once per parameter tuple.
    async fn execute_batch(
        &mut self,
        sql: &str,
        rows: &[Vec<RowValues>],
    ) -> Result<(), DriverFault>;

    /// Drain every remaining buffered row.
    async fn fetch_all(&mut self) -> Result<Vec<Vec<RowValues>>, DriverFault>;

    /// Drain at most `n` buffered rows.
    async fn fetch_many(&mut self, n: usize) -> Result<Vec<Vec<RowValues>>, DriverFault>;

    /// Take the next buffered row, if any.
    async fn fetch_one(&mut self) -> Result<Option<Vec<RowValues>>, DriverFault>;

    /// Column names of the most recent execute, in engine-declared order.
    fn column_names(&self) -> &[String];

    async fn commit(&mut self) -> Result<(), DriverFault>;

    async fn rollback(&mut self) -> Result<(), DriverFault>;

    /// Release the physical connection. Idempotent; closing an already
    /// closed connection is a no-op.
    async fn close(&mut self);
}
