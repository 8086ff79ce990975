//! Convenient imports for common functionality.

pub use crate::config::{RetryPolicy, SessionConfig};
pub use crate::driver::{ConnectTarget, DriverConnection, DriverFault, SqlDriver};
pub use crate::environment::{Environment, EnvironmentResolver, FixedEnvironment};
pub use crate::error::MysqlSessionError;
pub use crate::query_builder::SelectOptions;
pub use crate::results::{ResultSet, RowRecord};
pub use crate::session::{Session, Statement};
pub use crate::types::RowValues;

#[cfg(feature = "mysql")]
pub use crate::mysql::{MysqlDriver, MysqlSession};
