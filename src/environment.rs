use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Classification of the runtime the session is executing in.
///
/// Connection setup and the destructive-operation gate both key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// Developer workstation; connect to a local MySQL server over TCP.
    Local,
    /// Continuous-integration runner; treated like a workstation.
    ContinuousIntegration,
    /// Managed hosting platform fronted by a database proxy; connect over
    /// the proxy's Unix socket.
    Hosted,
}

impl Environment {
    /// Whether table drops and other destructive maintenance are permitted.
    #[must_use]
    pub fn allows_destructive_ops(self) -> bool {
        matches!(self, Self::Local | Self::ContinuousIntegration)
    }
}

/// External capability that classifies the current runtime.
///
/// Implementations must be pure: `classify` may be called at any time,
/// including once per reconnect.
pub trait EnvironmentResolver: Send + Sync {
    fn classify(&self) -> Environment;

    /// The hosting platform's application identifier, used to synthesize the
    /// proxy socket path in [`Environment::Hosted`]. `None` everywhere else.
    fn application_id(&self) -> Option<String> {
        None
    }
}

/// Resolver for callers that already know their environment out of band.
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    environment: Environment,
    application_id: Option<String>,
}

impl FixedEnvironment {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            application_id: None,
        }
    }

    #[must_use]
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }
}

impl EnvironmentResolver for FixedEnvironment {
    fn classify(&self) -> Environment {
        self.environment
    }

    fn application_id(&self) -> Option<String> {
        self.application_id.clone()
    }
}
