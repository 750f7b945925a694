// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loading [`Settings`] from disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use stratum_core::Settings;

/// An error raised while reading or writing a settings file.
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read or written.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The file is not valid settings JSON.
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, source } => {
                write!(f, "Cannot access settings file '{}': {source}", path.display())
            }
            SettingsError::Parse { path, source } => {
                write!(f, "Invalid settings in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            SettingsError::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads settings from a JSON file. Fields missing from the file take their defaults.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Settings::from_json(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_settings`], but falls back to [`Settings::default`] on any error.
pub fn load_settings_or_default(path: impl AsRef<Path>) -> Settings {
    match load_settings(&path) {
        Ok(settings) => {
            log::info!("Loaded settings from '{}'.", path.as_ref().display());
            settings
        }
        Err(err) => {
            log::warn!("{err}. Using default settings.");
            Settings::default()
        }
    }
}

/// Writes settings as pretty-printed JSON.
pub fn save_settings(path: impl AsRef<Path>, settings: &Settings) -> Result<(), SettingsError> {
    let path = path.as_ref();
    let json = settings.to_json().map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stratum_core::{BackendKind, ResetFlags};

    #[test]
    fn load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "backend": "immediate", "width": 320, "height": 240 }}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.backend, BackendKind::Immediate);
        assert_eq!((settings.width, settings.height), (320, 240));
        assert_eq!(settings.reset, ResetFlags::VSYNC);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stratum.json");
        let settings = Settings {
            width: 1920,
            height: 1080,
            ..Settings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_settings(&missing).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ width: ").unwrap();
        assert!(matches!(
            load_settings(&broken),
            Err(SettingsError::Parse { .. })
        ));
        assert_eq!(load_settings_or_default(&broken), Settings::default());
    }
}
