use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::ConnectTarget;
use crate::environment::Environment;
use crate::error::MysqlSessionError;

/// Immutable connection configuration, supplied once at session construction.
///
/// Exactly one credential set (hosted vs local) is derived from it at connect
/// time; the other fields are simply ignored for that connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hosted database instance name, including the region where the
    /// platform requires it (e.g. `us-central1:production-01`).
    pub hosted_instance_id: Option<String>,
    pub hosted_user: String,
    pub local_user: Option<String>,
    pub local_password: Option<String>,
    pub local_host: String,
    pub local_port: u16,
    pub db_name: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            hosted_instance_id: None,
            hosted_user: "root".to_string(),
            local_user: None,
            local_password: None,
            local_host: "127.0.0.1".to_string(),
            local_port: 3306,
            db_name: db_name.into(),
        }
    }

    #[must_use]
    pub fn with_local_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.local_user = Some(user.into());
        self.local_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_local_endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.local_host = host.into();
        self.local_port = port;
        self
    }

    #[must_use]
    pub fn with_hosted_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.hosted_instance_id = Some(instance_id.into());
        self
    }

    #[must_use]
    pub fn with_hosted_user(mut self, user: impl Into<String>) -> Self {
        self.hosted_user = user.into();
        self
    }

    /// Derive the connect target for `environment`.
    ///
    /// # Errors
    /// Returns `MysqlSessionError::ConfigError` when the fields the selected
    /// environment needs are missing.
    pub(crate) fn connect_target(
        &self,
        environment: Environment,
        application_id: Option<&str>,
    ) -> Result<ConnectTarget, MysqlSessionError> {
        match environment {
            Environment::Local | Environment::ContinuousIntegration => {
                let user = self.local_user.clone().ok_or_else(|| {
                    MysqlSessionError::ConfigError(
                        "local_user is required outside hosted environments".to_string(),
                    )
                })?;
                Ok(ConnectTarget::Tcp {
                    host: self.local_host.clone(),
                    port: self.local_port,
                    database: self.db_name.clone(),
                    user,
                    password: self.local_password.clone(),
                })
            }
            Environment::Hosted => {
                let instance = self.hosted_instance_id.as_deref().ok_or_else(|| {
                    MysqlSessionError::ConfigError(
                        "hosted_instance_id is required in hosted environments".to_string(),
                    )
                })?;
                let app_id = application_id.ok_or_else(|| {
                    MysqlSessionError::ConfigError(
                        "hosting platform application id unavailable".to_string(),
                    )
                })?;
                Ok(ConnectTarget::Socket {
                    path: format!("/cloudsql/{app_id}:{instance}"),
                    database: self.db_name.clone(),
                    user: self.hosted_user.clone(),
                })
            }
        }
    }
}

/// Bounds the retry loop: at most `max_attempts` executes per statement, with
/// exponential delay between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    /// Delay before re-attempting after failure number `attempt` (1-indexed):
    /// `base_backoff * 2^(attempt-1)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_backoff * 2u32.saturating_pow(exponent)
    }
}
