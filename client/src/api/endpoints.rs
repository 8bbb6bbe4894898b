//! Validation API endpoints.
//!
//! | Method | Path                       | Description                     |
//! |--------|----------------------------|---------------------------------|
//! | POST   | `/v1/validate`             | Create an async validation task |
//! | GET    | `/v1/validate/{task_id}`   | Task status and result          |
//! | POST   | `/v1/validate/core`        | Synchronous validation          |
//! | POST   | `/v1/validate/structure`   | Dataset structure only          |
//! | POST   | `/v1/validate/schema`      | Data dictionary schema only     |
//! | GET    | `/health`                  | Health check                    |

use crate::config::Config;

const CREATE_TASK_PATH: &str = "/v1/validate";
const TASK_STATUS_TEMPLATE: &str = "/v1/validate/{task_id}";
const SYNC_CORE_PATH: &str = "/v1/validate/core";
const STRUCTURE_PATH: &str = "/v1/validate/structure";
const SCHEMA_PATH: &str = "/v1/validate/schema";
const HEALTH_PATH: &str = "/health";

/// Absolute endpoint URLs for one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.as_str())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn create_task(&self) -> String {
        self.join(CREATE_TASK_PATH)
    }

    /// `task_id` is substituted literally, without escaping.
    pub fn task_status(&self, task_id: &str) -> String {
        self.join(&TASK_STATUS_TEMPLATE.replace("{task_id}", task_id))
    }

    pub fn sync_core(&self) -> String {
        self.join(SYNC_CORE_PATH)
    }

    pub fn structure(&self) -> String {
        self.join(STRUCTURE_PATH)
    }

    pub fn schema(&self) -> String {
        self.join(SCHEMA_PATH)
    }

    pub fn health(&self) -> String {
        self.join(HEALTH_PATH)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}
