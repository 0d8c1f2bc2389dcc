//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// How many high scores are kept
const MAX_HIGH_SCORES: usize = 10;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Best finished games, highest first
    pub high_scores: Vec<ScoreEntry>,
}

/// Key names for one action: a single name or a list of names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    pub fn names(&self) -> &[String] {
        match self {
            Keys::One(name) => std::slice::from_ref(name),
            Keys::Many(names) => names,
        }
    }
}

impl From<&str> for Keys {
    fn from(name: &str) -> Self {
        Keys::One(name.to_string())
    }
}

impl From<&[&str]> for Keys {
    fn from(names: &[&str]) -> Self {
        Keys::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

/// Key bindings, by key name (see `input` for the accepted names)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Keys,
    pub move_right: Keys,
    pub soft_drop: Keys,
    pub hard_drop: Keys,
    pub rotate: Keys,
    pub pause: Keys,
    pub start: Keys,
    pub quit: Keys,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
    /// Particle burst when a line clears
    pub effects: bool,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Ignore move/rotate/drop keys while paused
    pub lock_controls_while_paused: bool,
    /// Fixed piece sequence; random when unset
    pub seed: Option<u64>,
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    /// Seconds since the Unix epoch
    pub achieved_at: u64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: "Left".into(),
            move_right: "Right".into(),
            soft_drop: "Down".into(),
            hard_drop: "Space".into(),
            rotate: ["Up", "x"].as_slice().into(),
            pause: ["p", "Esc"].as_slice().into(),
            start: "Enter".into(),
            quit: "q".into(),
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "solid".to_string(),
            effects: true,
        }
    }
}

impl Settings {
    /// `settings.toml` in the platform config directory
    fn settings_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Load settings from disk; anything missing or unreadable falls back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("No config directory, using default settings");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                tracing::debug!("No settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings TOML, falling back to defaults if it is malformed
    pub fn parse(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed settings: {}", e);
            Self::default()
        })
    }

    /// Write settings (including high scores) back to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::settings_path().ok_or("Could not determine config directory")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;
        fs::write(&path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        tracing::debug!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Record a finished game; games that scored nothing are not kept
    pub fn add_high_score(&mut self, score: u64, level: u32, lines: u32) {
        if score == 0 {
            return;
        }
        let achieved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.high_scores.push(ScoreEntry {
            score,
            level,
            lines,
            achieved_at,
        });
        self.high_scores.sort_by(|a, b| b.score.cmp(&a.score));
        self.high_scores.truncate(MAX_HIGH_SCORES);
    }

    /// Get the best score so far
    pub fn best_score(&self) -> Option<u64> {
        self.high_scores.first().map(|e| e.score)
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> &'static str {
        match self.block_style.as_str() {
            "bracket" => "[]",
            "round" => "()",
            _ => "██", // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Settings::parse(""), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::parse(
            r#"
            [gameplay]
            seed = 1234

            [keys]
            quit = "Esc"
            "#,
        );
        assert_eq!(settings.gameplay.seed, Some(1234));
        assert!(!settings.gameplay.lock_controls_while_paused);
        assert_eq!(settings.keys.quit.names(), ["Esc"]);
        assert_eq!(settings.keys.move_left.names(), ["Left"]);
        assert!(settings.visual.effects);
    }

    #[test]
    fn test_keys_accept_string_or_list() {
        let settings = Settings::parse(
            r#"
            [keys]
            rotate = ["Up", "w", "k"]
            hard_drop = "Enter"
            "#,
        );
        assert_eq!(settings.keys.rotate.names(), ["Up", "w", "k"]);
        assert_eq!(settings.keys.hard_drop, Keys::One("Enter".to_string()));
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        assert_eq!(Settings::parse("[keys\nquit = 3"), Settings::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.gameplay.seed = Some(99);
        settings.add_high_score(1200, 3, 11);
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::parse(&text), settings);
    }

    #[test]
    fn test_high_scores_sorted_and_capped() {
        let mut settings = Settings::default();
        settings.add_high_score(0, 1, 0);
        assert!(settings.high_scores.is_empty());

        for score in 1..=15 {
            settings.add_high_score(score * 100, 1, score as u32);
        }
        assert_eq!(settings.high_scores.len(), MAX_HIGH_SCORES);
        assert_eq!(settings.best_score(), Some(1500));
        assert_eq!(settings.high_scores.last().map(|e| e.score), Some(600));
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars(), "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), "[]");
    }
}
