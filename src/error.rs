use thiserror::Error;

use crate::driver::DriverFault;

#[derive(Debug, Error)]
pub enum MysqlSessionError {
    /// Fault reported by the driver adapter during execute/fetch.
    #[error(transparent)]
    Driver(#[from] DriverFault),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Recoverable faults persisted past the retry policy's attempt budget.
    /// Carries the fault seen on the final attempt.
    #[error("retries exhausted after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: DriverFault,
    },

    /// Rows handed to a multi-row insert disagree on their column sets.
    /// Raised before any SQL is issued.
    #[error("Inconsistent insert fields: {0}")]
    SchemaMismatch(String),

    /// Commit failed; a rollback has already been issued by the time this
    /// surfaces.
    #[error("commit failed and was rolled back")]
    CommitError {
        #[source]
        source: DriverFault,
    },

    /// Destructive operation requested outside an allowed environment.
    #[error("Unsafe operation refused: {0}")]
    UnsafeOperation(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
