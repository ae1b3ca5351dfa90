//! Config file loading
//!
//! A settings file is TOML with two optional tables:
//!
//! ```toml
//! [game]
//! turn_rate = 0.1
//! seed = 42
//!
//! [commentary]
//! timeout_secs = 5
//! ```

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::commentary::CommentaryConfig;
use crate::game::GameConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub commentary: CommentaryConfig,
}

impl Settings {
    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.game
            .validate()
            .map_err(|msg| anyhow!("invalid game config: {msg}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[game]\nturn_rate = 0.2\nseed = 42\n\n[commentary]\ntimeout_secs = 3\n"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.game.turn_rate, 0.2);
        assert_eq!(settings.game.seed, Some(42));
        assert_eq!(settings.game.initial_length, 15);
        assert_eq!(settings.commentary.timeout_secs, 3);
        assert_eq!(settings.commentary.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nturn_rate = 2.0\n").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("turn_rate"));
    }

    #[test]
    fn test_load_rejects_zero_collision_skip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nself_collision_skip = 0\n").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("self_collision_skip"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
