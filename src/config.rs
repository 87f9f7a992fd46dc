// SPDX-License-Identifier: MIT
//
// Settings file for the overlay CLI.
//
// Lookup order: `--config <path>` if given (must exist), otherwise
// `danmaku-overlay.toml` in the working directory if present, otherwise
// built-in defaults. Command-line flags override whatever was loaded.
//
//   endpoint       = "https://mechakucha-api.herokuapp.com/himawari"
//   engine         = "canvas"          # or "dom"
//   video_height   = 720
//   delay          = 0.0
//   lenient_colors = false

use std::path::Path;

use anyhow::Context;
use dm_color::ColorPolicy;
use dm_comment::Engine;
use dm_comment::source::DEFAULT_ENDPOINT;
use dm_player::PlayerOptions;
use serde::{Deserialize, Serialize};

/// File looked for in the working directory when no `--config` is given.
pub const CONFIG_FILENAME: &str = "danmaku-overlay.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL for remote comment sets.
    pub endpoint: String,
    pub engine: Engine,
    /// Video height in pixels used for font sizing.
    pub video_height: u32,
    /// Seconds added to every comment time.
    pub delay: f64,
    /// Treat unparsable colors as dark instead of failing.
    pub lenient_colors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            engine: Engine::default(),
            video_height: 720,
            delay: 0.0,
            lenient_colors: false,
        }
    }
}

impl Settings {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(settings)
    }

    /// Load `explicit` if given, else the default file if it exists, else
    /// defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(CONFIG_FILENAME);
        if default_path.exists() {
            tracing::debug!(path = CONFIG_FILENAME, "using config from working directory");
            return Self::load(default_path);
        }
        Ok(Self::default())
    }

    pub const fn policy(&self) -> ColorPolicy {
        ColorPolicy::from_lenient(self.lenient_colors)
    }

    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            endpoint: self.endpoint.clone(),
            policy: self.policy(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(s.engine, Engine::Canvas);
        assert_eq!(s.video_height, 720);
        assert_eq!(s.policy(), ColorPolicy::Strict);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let s: Settings = toml::from_str("engine = \"dom\"\nlenient_colors = true\n").unwrap();
        assert_eq!(s.engine, Engine::Dom);
        assert_eq!(s.policy(), ColorPolicy::Lenient);
        assert_eq!(s.video_height, 720);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<Settings>("colour = \"red\"\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "endpoint = \"http://localhost:9000\"\ndelay = 1.5\n").unwrap();
        let s = Settings::resolve(Some(&path)).unwrap();
        assert_eq!(s.endpoint, "http://localhost:9000");
        assert_eq!(s.delay, 1.5);
        assert_eq!(s.player_options().endpoint, "http://localhost:9000");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::resolve(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("missing.toml"), "{err}");
    }
}
