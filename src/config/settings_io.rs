use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::settings::GameSettings;

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("life-sim");
    path.push("settings.json");
    path
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings(path: Option<&Path>) -> GameSettings {
    let path = path.map(Path::to_path_buf).unwrap_or_else(settings_path);

    let settings = match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<GameSettings>(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring invalid settings file {}: {}", path.display(), e);
                GameSettings::default()
            }
        },
        Err(_) => {
            log::debug!("no settings file at {}, using defaults", path.display());
            GameSettings::default()
        }
    };

    settings.normalized()
}

pub fn save_settings(settings: &GameSettings, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(settings_path);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
