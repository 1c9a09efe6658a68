use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::game::sequencer::DEFAULT_SOUND_ASSET;

const SETTINGS_FILE_NAME: &str = "settings.json";
const DATA_DIR_ENV: &str = "LIMBOKEYS_DATA_DIR";
const DEBUG_ENV: &str = "LIMBOKEYS_DEBUG";
pub const LOG_ENV: &str = "LIMBOKEYS_LOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub sound_asset: String,
    pub volume: f32,
    pub sound_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound_enabled: true,
            sound_asset: DEFAULT_SOUND_ASSET.to_string(),
            volume: 1.0,
            sound_dir: None,
        }
    }
}

impl Settings {
    fn normalized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if self.sound_asset.trim().is_empty() {
            self.sound_asset = DEFAULT_SOUND_ASSET.to_string();
        }
        self
    }

    pub fn sound_dir(&self) -> PathBuf {
        if let Some(dir) = &self.sound_dir {
            return dir.clone();
        }
        match std::env::var_os(DATA_DIR_ENV) {
            Some(data_dir) => PathBuf::from(data_dir).join("sounds"),
            None => PathBuf::from("data/sounds"),
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(
        PathBuf::from(home)
            .join(".config/limbokeys")
            .join(SETTINGS_FILE_NAME),
    )
}

pub fn parse_settings(raw: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str::<Settings>(raw).map(Settings::normalized)
}

/// Reads the settings file, falling back to defaults when it is absent or broken.
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Settings::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "Could not read settings");
            return Settings::default();
        }
    };
    match parse_settings(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "Ignoring malformed settings");
            Settings::default()
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "yes" | "on")
}

pub fn debug_mode_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| flag_enabled(&value))
        .unwrap_or(false)
}
