use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

pub const CONFIG_ENV: &str = "NUMBER_GUESS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "number_guess.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub leaderboard_path: PathBuf,
    pub display_top: usize,
    pub levels: u8,
    pub first_level_digits: usize,
    pub seed: Option<u64>,
    pub script: Option<PathBuf>,
    pub background_track: Option<String>,
    pub reveal_magic_number: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            leaderboard_path: PathBuf::from("highscores.txt"),
            display_top: 5,
            levels: 3,
            first_level_digits: 4,
            seed: None,
            script: None,
            background_track: None,
            reveal_magic_number: false,
        }
    }
}

impl GameConfig {
    /// Resolves the config file from `NUMBER_GUESS_CONFIG`, falling back to
    /// `number_guess.json` in the working directory.
    pub fn from_env() -> GameResult<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::parse(&text)?;
                config.validate(path)?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No configuration at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(GameError::Config {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }),
        }
    }

    pub fn parse(text: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn validate(&self, path: &Path) -> GameResult<()> {
        let reason = if self.levels == 0 {
            "levels must be at least 1"
        } else if self.first_level_digits == 0 {
            "first_level_digits must be at least 1"
        } else {
            return Ok(());
        };
        Err(GameError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })
    }
}
