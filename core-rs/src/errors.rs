//! Error types for portscout
//!
//! Probing itself never fails: bind errors collapse into "unavailable".
//! These variants cover the surfaces around it (config files, CLI deadlines).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortscoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, PortscoutError>;
