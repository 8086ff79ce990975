use tokio::time::sleep;
use tracing::warn;

use super::Session;
use crate::driver::{DriverConnection, SqlDriver};
use crate::error::MysqlSessionError;
use crate::types::RowValues;

/// One statement handed to the resilient executor: either a single execute
/// or a batch (one parameter tuple per row).
#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Single {
        sql: &'a str,
        params: &'a [RowValues],
    },
    Batch {
        sql: &'a str,
        rows: &'a [Vec<RowValues>],
    },
}

impl Statement<'_> {
    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            Self::Single { sql, .. } | Self::Batch { sql, .. } => sql,
        }
    }
}

impl<D: SqlDriver> Session<D> {
    /// Execute one statement, transparently recovering from recoverable
    /// driver faults.
    ///
    /// On a recoverable fault the connection is torn down and re-created
    /// (the fault is assumed to be connection-state corruption a fresh
    /// socket clears), then the call blocks for `base_backoff * 2^(k-1)`
    /// before attempt `k+1` (backoff protects against a flapping backend).
    /// Non-recoverable faults propagate immediately, with no reconnect and
    /// no delay.
    ///
    /// # Errors
    /// - `MysqlSessionError::Driver` for a non-recoverable fault.
    /// - `MysqlSessionError::RetryExhausted` once `max_attempts` executes
    ///   have failed recoverably; carries the final fault. The session holds
    ///   a fresh connection afterwards and remains usable.
    /// - `MysqlSessionError::ConnectionError` if a reconnect itself fails;
    ///   the session is left disconnected and reconnects on its next use.
    pub async fn execute_with_retry(
        &mut self,
        statement: Statement<'_>,
    ) -> Result<(), MysqlSessionError> {
        self.record_statement(statement.sql());
        let mut attempt: u32 = 0;
        loop {
            let outcome = {
                let conn = self.conn_mut().await?;
                match statement {
                    Statement::Single { sql, params } => conn.execute(sql, params).await,
                    Statement::Batch { sql, rows } => conn.execute_batch(sql, rows).await,
                }
            };

            let fault = match outcome {
                Ok(()) => return Ok(()),
                Err(fault) if !fault.is_recoverable() => return Err(fault.into()),
                Err(fault) => fault,
            };

            warn!(error = %fault, attempt, "recoverable execute fault, reconnecting");
            self.discard_connection().await;
            self.connect().await?;

            attempt += 1;
            if attempt >= self.retry_policy().max_attempts {
                return Err(MysqlSessionError::RetryExhausted {
                    attempts: attempt,
                    source: fault,
                });
            }
            sleep(self.retry_policy().backoff_delay(attempt)).await;
        }
    }
}
