//! Application-wide error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid value '{value}' for option '{key}' in section [{section}]")]
    InvalidOptionValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("incomplete credential for switch {address}: username and password are both required")]
    IncompleteCredential { address: String },

    #[error("invalid section name [{name}]")]
    InvalidSectionName { name: String },

    #[error("option '{key}' appears before any section header")]
    OptionOutsideSection { key: String },

    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("duplicate section [{name}]")]
    DuplicateSection { name: String },

    #[error("duplicate option '{key}' in section [{section}]")]
    DuplicateKey { section: String, key: String },

    #[error("cannot map section [{section}]: {message}")]
    Schema { section: String, message: String },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render configuration: {0}")]
    Render(#[from] serde_json::Error),

    #[error("logger error: {0}")]
    Logger(String),
}

impl AppError {
    pub(crate) fn invalid(section: &str, key: &str, value: &str) -> Self {
        Self::InvalidOptionValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
