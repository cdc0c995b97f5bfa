//! Run settings: CLI arguments over an optional TOML file over defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// Optional settings from a TOML config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub song_data: Option<String>,
    pub log_data: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// The resolved settings for one run.
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
}

impl Settings {
    /// Merge CLI values over file config over built-in defaults.
    pub fn resolve(
        cli_db_path: Option<PathBuf>,
        cli_song_data: Option<PathBuf>,
        cli_log_data: Option<PathBuf>,
        file: FileConfig,
    ) -> Self {
        let pick = |cli: Option<PathBuf>, file: Option<String>, default: &str| {
            cli.or_else(|| file.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Settings {
            db_path: pick(cli_db_path, file.db_path, DEFAULT_DB_PATH),
            song_data: pick(cli_song_data, file.song_data, DEFAULT_SONG_DATA),
            log_data: pick(cli_log_data, file.log_data, DEFAULT_LOG_DATA),
        }
    }
}
