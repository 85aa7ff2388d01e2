//! Dashboard display preferences persisted as a small JSON file.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences io error: {0}")]
    Io(#[from] io::Error),
    #[error("preferences encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the system color scheme.
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeMode,
    pub language: Language,
    /// Denser card layout on the overview.
    pub compact: bool,
}

impl Preferences {
    /// Load preferences from `path`.
    ///
    /// A missing file yields the defaults. An unreadable or corrupt file is
    /// logged and also yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring preferences at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>, PrefsError> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Write preferences to `path` through a temp file and rename, so a
    /// crash never leaves a half-written file behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PrefsError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        tracing::debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(dir.path().join("prefs.json"));
        assert_eq!(prefs.theme, ThemeMode::Auto);
        assert_eq!(prefs.language, Language::Zh);
        assert!(!prefs.compact);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = Preferences {
            theme: ThemeMode::Dark,
            language: Language::En,
            compact: true,
        };

        assert_ok!(prefs.save(&path));
        assert_eq!(Preferences::load(&path), prefs);
        assert!(!dir.path().join("prefs.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme":"light"}"#).unwrap();

        let prefs = Preferences::load(&path);
        assert_eq!(prefs.theme, ThemeMode::Light);
        assert_eq!(prefs.language, Language::Zh);
    }
}
