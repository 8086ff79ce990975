use tracing::{error, warn};

use super::Session;
use crate::driver::{DriverConnection, SqlDriver};
use crate::error::MysqlSessionError;

impl<D: SqlDriver> Session<D> {
    /// Commit the connection's pending transaction. INSERT and UPDATE
    /// operations call this themselves; it is public for callers batching
    /// several writes into one unit of work.
    ///
    /// A failed commit is always followed by an explicit rollback before the
    /// error surfaces; the connection is never left mid-transaction.
    ///
    /// # Errors
    /// `MysqlSessionError::CommitError` wrapping the driver fault; the
    /// rollback has already been issued by then.
    pub async fn commit(&mut self) -> Result<(), MysqlSessionError> {
        let commit_result = {
            let conn = self.conn_mut().await?;
            conn.commit().await
        };

        match commit_result {
            Ok(()) => Ok(()),
            Err(fault) => {
                let statement = self.last_statement().unwrap_or("<none>").to_string();
                error!(statement = %statement, error = %fault, "commit failed, rolling back");
                let conn = self.conn_mut().await?;
                if let Err(rollback_fault) = conn.rollback().await {
                    warn!(error = %rollback_fault, "rollback after failed commit also failed");
                }
                Err(MysqlSessionError::CommitError { source: fault })
            }
        }
    }
}
