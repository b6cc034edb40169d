use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectError>;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Unknown namespace length. Expecting at least {expected}, is {actual}: {pattern}")]
    NamespaceTooShort {
        pattern: String,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot read process table at {}: {source}", .path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectError {
    /// True for both pattern validation and missing config values.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CollectError::NamespaceTooShort { .. } | CollectError::Configuration(_)
        )
    }

    pub fn is_data_source(&self) -> bool {
        matches!(self, CollectError::DataSource { .. })
    }
}
