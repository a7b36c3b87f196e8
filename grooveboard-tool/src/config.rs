use std::path::{Path, PathBuf};
use std::time::Duration;

use grooveboard_core::{
    BoardCatalog, BoardSize, InteractionMode, ItemTemplate, ItemTemplateCatalog,
    LONG_PRESS_THRESHOLD,
};
use serde::Deserialize;

use crate::error::ToolError;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Key of the board to start with.
    pub board: Option<String>,
    pub mode: Option<InteractionMode>,
    pub long_press_ms: Option<u64>,
    #[serde(default)]
    pub boards: Vec<BoardSize>,
    #[serde(default)]
    pub templates: Vec<ItemTemplate>,
}

/// Editor flags given on the command line.
#[derive(Debug, Clone, Default)]
pub struct EditOverrides {
    pub board: Option<String>,
    pub touch: bool,
    pub empty: bool,
}

/// Everything the editor needs, with CLI flags applied over the config file.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub boards: BoardCatalog,
    pub templates: ItemTemplateCatalog,
    pub board: BoardSize,
    pub mode: InteractionMode,
    pub long_press: Duration,
    pub seed_starter_items: bool,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("grooveboard").join("config.toml"))
}

/// Reads the config file.
///
/// An explicit path must exist. The default location is optional and a
/// missing file there yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ToolError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ToolError::ConfigNotFound(path.to_path_buf()));
            }
            path.to_path_buf()
        }
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content).map_err(|source| ToolError::Config {
        path: path.clone(),
        source,
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Catalogs with configured presets and templates merged in.
pub fn catalogs(config: &Config) -> (BoardCatalog, ItemTemplateCatalog) {
    let mut boards = BoardCatalog::builtin();
    boards.extend(config.boards.iter().cloned());
    let mut templates = ItemTemplateCatalog::builtin();
    templates.extend(config.templates.iter().cloned());
    (boards, templates)
}

pub fn resolve_settings(config: Config, overrides: EditOverrides) -> Result<EditorSettings, ToolError> {
    let (boards, templates) = catalogs(&config);

    let board = match overrides.board.or(config.board) {
        Some(key) => boards
            .by_key(&key)
            .cloned()
            .ok_or(ToolError::UnknownBoard(key))?,
        None => boards.default_board().cloned().ok_or(ToolError::NoBoards)?,
    };

    let mode = if overrides.touch {
        InteractionMode::Touch
    } else {
        config.mode.unwrap_or_default()
    };

    let long_press = config
        .long_press_ms
        .map(Duration::from_millis)
        .unwrap_or(LONG_PRESS_THRESHOLD);

    Ok(EditorSettings {
        boards,
        templates,
        board,
        mode,
        long_press,
        seed_starter_items: !overrides.empty,
    })
}
