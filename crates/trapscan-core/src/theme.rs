use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Light/dark presentation preference. Defaults to light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => bail!("unknown theme `{other}` (expected light or dark)"),
        }
    }
}

/// Persistence backend for the theme preference.
pub trait ThemeStore: Send + Sync {
    /// Read the stored preference, `None` when nothing was saved.
    fn load(&self) -> Result<Option<ThemePreference>>;

    fn save(&self, preference: ThemePreference) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: ThemePreference,
}

/// Stores the preference as `{"theme": "..."}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform configuration directory.
    pub fn in_config_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "trapscan", "trapscan")
            .context("could not determine a configuration directory")?;
        Ok(Self::new(dirs.config_dir().join("theme.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read theme file at {}", self.path.display()))?;
        let stored: StoredTheme = serde_json::from_str(&raw)
            .with_context(|| format!("invalid theme file at {}", self.path.display()))?;
        Ok(Some(stored.theme))
    }

    fn save(&self, preference: ThemePreference) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create theme directory {}", parent.display())
            })?;
        }
        let body = serde_json::to_string(&StoredTheme { theme: preference })?;
        fs::write(&self.path, body)
            .with_context(|| format!("failed to write theme file at {}", self.path.display()))
    }
}

/// In-process store, used by tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    value: Mutex<Option<ThemePreference>>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        Ok(*self.value.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, preference: ThemePreference) -> Result<()> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(preference);
        Ok(())
    }
}

/// Applies and persists the theme. Independent of the analysis pipeline.
pub struct ThemeController<S: ThemeStore> {
    store: S,
    current: ThemePreference,
}

impl<S: ThemeStore> ThemeController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: ThemePreference::default(),
        }
    }

    /// Read the persisted preference and apply it. Missing or unreadable
    /// values fall back to light.
    pub fn load_initial(&mut self) -> ThemePreference {
        self.current = match self.store.load() {
            Ok(Some(preference)) => preference,
            Ok(None) => ThemePreference::default(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable theme preference");
                ThemePreference::default()
            }
        };
        debug!(theme = %self.current, "theme applied");
        self.current
    }

    pub fn set_theme(&mut self, preference: ThemePreference) -> Result<()> {
        self.current = preference;
        self.store.save(preference)
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light_when_nothing_saved() {
        let mut controller = ThemeController::new(MemoryThemeStore::default());
        assert_eq!(controller.load_initial(), ThemePreference::Light);
    }

    #[test]
    fn set_theme_persists_across_controllers() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested/theme.json");

        let mut first = ThemeController::new(FileThemeStore::new(&path));
        first.set_theme(ThemePreference::Dark).unwrap();
        assert_eq!(first.current(), ThemePreference::Dark);

        let mut second = ThemeController::new(FileThemeStore::new(&path));
        assert_eq!(second.load_initial(), ThemePreference::Dark);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"theme":"dark"}"#
        );
    }

    #[test]
    fn corrupt_file_falls_back_to_light() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("theme.json");
        fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();

        let mut controller = ThemeController::new(FileThemeStore::new(&path));
        assert_eq!(controller.load_initial(), ThemePreference::Light);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" DARK ".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("blue".parse::<ThemePreference>().is_err());
    }
}
