//! The one piece of state that survives between runs: the colour theme.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PreferencesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Theme,
}

/// Read the persisted theme, falling back to the default when the file is
/// missing or unreadable.
pub fn load_theme(path: &Path) -> Theme {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No preferences at {}: {}", path.display(), e);
            return Theme::default();
        }
    };

    match toml::from_str::<Preferences>(&content) {
        Ok(preferences) => preferences.theme,
        Err(e) => {
            warn!("Ignoring malformed preferences {}: {}", path.display(), e);
            Theme::default()
        }
    }
}

pub fn save_theme(path: &Path, theme: Theme) -> Result<(), PreferencesError> {
    let content = toml::to_string(&Preferences { theme })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PreferencesError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| PreferencesError::Write {
        path: path.to_path_buf(),
        source,
    })
}
