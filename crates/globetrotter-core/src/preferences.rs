//! Persisted view preferences: the last active dashboard section and the
//! theme choice. Nothing else about the UI is stored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Dashboard sections, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Map,
    Weather,
    Clock,
    Currency,
    Airports,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Map,
        Section::Weather,
        Section::Clock,
        Section::Currency,
        Section::Airports,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Map => "World Map",
            Self::Weather => "Weather",
            Self::Clock => "World Clock",
            Self::Currency => "Currency Converter",
            Self::Airports => "Airports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub active_section: Section,
}

impl Preferences {
    /// Read preferences, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read preferences {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("Ignoring malformed preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize preferences")?;
        std::fs::write(path, contents).context("Failed to write preferences file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load_from(&dir.path().join("preferences.toml"));
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.active_section, Section::Map);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globetrotter").join("preferences.toml");
        let prefs = Preferences {
            theme: Theme::Dark,
            active_section: Section::Currency,
        };

        prefs.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path), prefs);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "theme = \"neon\"").unwrap();
        assert_eq!(Preferences::load_from(&path), Preferences::default());
    }

    #[test]
    fn test_section_labels() {
        assert_eq!(Section::ALL.len(), 5);
        assert_eq!(Section::Clock.label(), "World Clock");
    }
}
