//! Resilient session middleware for MySQL.
//!
//! One [`Session`] owns one physical connection. Every statement runs through
//! a retrying executor that reconnects on recoverable driver faults and backs
//! off exponentially before re-attempting; everything else propagates
//! immediately. On top of that sit convenience operations for filtered
//! selects, multi-row inserts (plain or upsert), and keyed updates, with the
//! commit/rollback discipline MySQL writes need.

pub mod config;
pub mod driver;
pub mod environment;
pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod session;
pub mod types;

pub use config::{RetryPolicy, SessionConfig};
pub use driver::{ConnectTarget, DriverConnection, DriverFault, SqlDriver};
pub use environment::{Environment, EnvironmentResolver, FixedEnvironment};
pub use error::MysqlSessionError;
#[cfg(feature = "mysql")]
pub use mysql::{MysqlDriver, MysqlSession};
pub use query_builder::SelectOptions;
pub use results::{ResultSet, RowRecord};
pub use session::{Session, Statement};
pub use types::RowValues;
