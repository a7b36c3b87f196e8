use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown board size: {0}")]
    UnknownBoard(String),

    #[error("No board sizes configured")]
    NoBoards,

    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML export error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
