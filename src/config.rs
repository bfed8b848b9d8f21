// ============================================================================
// config.rs — ArcadeKit
// Key bindings for winit hosts: JSON load/save and conversion to a KeyMap.
// ============================================================================

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::error::ConfigError;
use crate::keys::{KeyMap, LogicalKey};

/// Physical keys bound to each logical key. Any field missing from the file
/// falls back to its default binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub confirm: Vec<KeyCode>,
    pub cancel: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: vec![KeyCode::ArrowUp],
            down: vec![KeyCode::ArrowDown],
            left: vec![KeyCode::ArrowLeft],
            right: vec![KeyCode::ArrowRight],
            confirm: vec![KeyCode::Enter],
            cancel: vec![KeyCode::Escape],
        }
    }
}

impl KeyBindings {
    /// Loads bindings from a JSON file.
    /// Returns the default bindings if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No bindings at {:?}; using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves bindings as pretty JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn codes(&self, key: LogicalKey) -> &[KeyCode] {
        match key {
            LogicalKey::Up => &self.up,
            LogicalKey::Down => &self.down,
            LogicalKey::Left => &self.left,
            LogicalKey::Right => &self.right,
            LogicalKey::Confirm => &self.confirm,
            LogicalKey::Cancel => &self.cancel,
        }
    }

    /// Build the tracker's mapping. A physical key bound to two logical keys
    /// is rejected.
    pub fn to_key_map(&self) -> Result<KeyMap<KeyCode>, ConfigError> {
        let mut seen: HashMap<KeyCode, LogicalKey> = HashMap::new();
        for key in LogicalKey::ALL {
            for &code in self.codes(key) {
                match seen.get(&code) {
                    Some(&first) if first != key => {
                        return Err(ConfigError::DuplicateBinding {
                            code: format!("{:?}", code),
                            first,
                            second: key,
                        });
                    }
                    _ => {
                        seen.insert(code, key);
                    }
                }
            }
        }
        Ok(seen.into_iter().collect())
    }
}
