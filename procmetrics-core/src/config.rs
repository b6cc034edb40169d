use crate::error::{CollectError, Result};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PROC_PATH: &str = "/proc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectorConfig {
    pub proc_path: PathBuf,
    pub log_level: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from(DEFAULT_PROC_PATH),
            log_level: "info".to_string(),
        }
    }
}

impl CollectorConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("PROCMETRICS_PROC_PATH") {
            config.proc_path = PathBuf::from(val);
        }

        if let Ok(val) = env::var("PROCMETRICS_LOG_LEVEL") {
            config.log_level = val;
        }

        config
    }

    pub fn with_proc_path(mut self, proc_path: impl Into<PathBuf>) -> Self {
        self.proc_path = proc_path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.proc_path.as_os_str().is_empty() {
            return Err(CollectError::Configuration(
                "proc_path is required".to_string(),
            ));
        }

        Ok(())
    }
}
