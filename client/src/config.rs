//! Client configuration.
//!
//! The API base URL depends on the deploy environment:
//!
//! | `DEPLOY_ENVIRONMENT` | Base URL                          |
//! |----------------------|-----------------------------------|
//! | `prod`               | `API_BASE` (empty if unset)       |
//! | `dev`, unset, other  | `http://localhost:8000`           |
//!
//! A `.env` file in the working directory is honoured.

use std::env;
use std::fmt;

/// Environment variable selecting `dev` or `prod`.
pub const DEPLOY_ENVIRONMENT_VAR: &str = "DEPLOY_ENVIRONMENT";

/// Environment variable holding the production base URL.
pub const API_BASE_VAR: &str = "API_BASE";

/// Local development server.
pub const DEV_API_BASE: &str = "http://localhost:8000";

/// Deploy environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployEnvironment {
    #[default]
    Dev,
    Prod,
}

impl DeployEnvironment {
    /// Anything other than exactly `dev` or `prod` falls back to `Dev`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("prod") => DeployEnvironment::Prod,
            _ => DeployEnvironment::Dev,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployEnvironment::Dev => "dev",
            DeployEnvironment::Prod => "prod",
        }
    }
}

impl fmt::Display for DeployEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub environment: DeployEnvironment,
    pub api_base: String,
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = DeployEnvironment::parse(lookup(DEPLOY_ENVIRONMENT_VAR).as_deref());

        let api_base = match environment {
            DeployEnvironment::Prod => lookup(API_BASE_VAR).unwrap_or_default(),
            DeployEnvironment::Dev => DEV_API_BASE.to_string(),
        };

        Self {
            environment,
            api_base,
        }
    }

    /// Replace the base URL, keeping the environment.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DeployEnvironment::Dev,
            api_base: DEV_API_BASE.to_string(),
        }
    }
}
