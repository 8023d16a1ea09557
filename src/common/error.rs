use crate::application::use_cases::locate_source_repo::{WorkflowError, WorkflowStage};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdRepoError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },
}

impl SdRepoError {
    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    /// Pipeline stage that failed, when the error came from the workflow
    pub fn workflow_stage(&self) -> Option<WorkflowStage> {
        match self {
            Self::Workflow(error) => Some(error.stage()),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for SdRepoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation_error("config", errors.to_string(), None)
    }
}
