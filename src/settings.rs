//! Settings persistence. The file keeps the entity limit rather than the
//! generation so it stays readable next to the tier table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::{Language, LimitTier, Settings, DEFAULT_AUDIO_VOLUME, DEFAULT_TIER};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {} is corrupted: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    audio_volume: f32,
    entity_limit: u16,
    language: Language,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            audio_volume: DEFAULT_AUDIO_VOLUME,
            entity_limit: DEFAULT_TIER.limit,
            language: Language::default(),
        }
    }
}

impl From<&Settings> for SettingsFile {
    fn from(settings: &Settings) -> Self {
        Self {
            audio_volume: settings.audio_volume,
            entity_limit: settings.tier.limit,
            language: settings.language,
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let mut settings = Settings {
            language: file.language,
            tier: LimitTier::for_limit(file.entity_limit).unwrap_or(DEFAULT_TIER),
            ..Settings::default()
        };
        settings.set_volume(file.audio_volume);
        settings
    }
}

pub fn default_settings_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("dexview"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("settings.json")
}

/// `Ok(None)` when no settings file exists yet.
pub async fn load_settings(path: &Path) -> Result<Option<Settings>, SettingsError> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let file: SettingsFile = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(file.into()))
}

/// Missing or unreadable files fall back to defaults.
pub async fn load_or_default(path: &Path) -> Settings {
    match load_settings(path).await {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(err) => {
            log::warn!("{err}; using default settings");
            Settings::default()
        }
    }
}

pub async fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_error = |source: std::io::Error| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(&SettingsFile::from(settings)).map_err(|source| {
        SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tokio::fs::write(path, json).await.map_err(io_error)?;
    log::debug!("settings saved to {}", path.display());
    Ok(())
}
