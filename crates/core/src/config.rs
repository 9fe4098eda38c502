//! Room tuning loaded from TOML.
//!
//! Every field has a default matching the shipped game, so an empty file or a
//! partial one is valid:
//!
//! ```toml
//! [grid]
//! width = 32
//! height = 20
//!
//! [timing]
//! round_delay = 40
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Edge length of one tile in world units.
    pub tile_size: i32,
    /// Tile codes per row of the tile sheet; the row decides solidity.
    pub tiles_per_row: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: 32, height: 20, tile_size: 24, tiles_per_row: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Animation buffer in ticks before the first turn of a round.
    pub round_delay: u32,
    /// Ticks after game over before a restart input is honoured.
    pub game_over_grace: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { round_delay: 40, game_over_grace: 30 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Shortest straight run of one group that counts as a match.
    pub match_length: usize,
    /// How many tiles a match scan walks out from its root.
    pub match_reach: i32,
    /// Node expansions before a path search gives up.
    pub search_cap: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self { match_length: 3, match_reach: 10, search_cap: 1000 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub combat: CombatConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid room configuration: {0}")]
    Invalid(String),
}

impl RoomConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must not be empty, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        if self.grid.tile_size <= 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".to_string()));
        }
        if self.grid.tiles_per_row == 0 {
            return Err(ConfigError::Invalid("tiles_per_row must be at least 1".to_string()));
        }
        if self.combat.match_length < 2 {
            return Err(ConfigError::Invalid(format!(
                "match_length must be at least 2, got {}",
                self.combat.match_length
            )));
        }
        Ok(())
    }
}

pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_yields_defaults() {
        let config = RoomConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, RoomConfig::default());
        assert_eq!(config.grid.width, 32);
        assert_eq!(config.timing.round_delay, 40);
        assert_eq!(config.combat.search_cap, 1000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RoomConfig::from_toml_str("[grid]\nwidth = 12\n\n[combat]\nmatch_length = 4\n")
            .expect("partial config should parse");
        assert_eq!(config.grid.width, 12);
        assert_eq!(config.grid.height, 20);
        assert_eq!(config.combat.match_length, 4);
        assert_eq!(config.combat.match_reach, 10);
    }

    #[test]
    fn rejects_degenerate_values() {
        let err = RoomConfig::from_toml_str("[grid]\ntiles_per_row = 0\n")
            .expect_err("zero tiles per row should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)), "unexpected error: {err}");

        let err = RoomConfig::from_toml_str("[combat]\nmatch_length = 1\n")
            .expect_err("single-tile matches should be rejected");
        assert!(err.to_string().contains("match_length"), "error should name the field: {err}");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = RoomConfig::from_toml_str("[grid\nwidth = ").expect_err("should not parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file_and_reports_missing_files() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("room.toml");
        fs::write(&path, "[timing]\nround_delay = 5\n").expect("write config");

        let config = RoomConfig::load(&path).expect("config should load");
        assert_eq!(config.timing.round_delay, 5);

        let missing = dir.path().join("missing.toml");
        let err = RoomConfig::load(&missing).expect_err("missing file should error");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }
}
