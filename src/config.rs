// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Application preferences.
//!
//! Preferences load from a JSON file; every field has a default so a partial
//! file is fine. Values that bind hardware (the map pan button) are
//! validated at load time and fail the start instead of falling back.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mapview::{PointerButton, UnsupportedButtonError};

fn default_spell_locale() -> String {
    "en".to_owned()
}

fn default_map_pan_button() -> String {
    "left".to_owned()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub check_spelling: bool,
    #[serde(default = "default_spell_locale")]
    pub spell_locale: String,
    #[serde(default = "default_map_pan_button")]
    pub map_pan_button: String,
    #[serde(default = "default_true")]
    pub map_wheel_zoom: bool,
    #[serde(default = "default_true")]
    pub map_double_click_zoom: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            check_spelling: false,
            spell_locale: default_spell_locale(),
            map_pan_button: default_map_pan_button(),
            map_wheel_zoom: true,
            map_double_click_zoom: true,
        }
    }
}

impl AppConfig {
    /// The validated pan-button binding.
    pub fn pan_button(&self) -> Result<PointerButton, UnsupportedButtonError> {
        PointerButton::from_name(&self.map_pan_button)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Parse { path: String, source: serde_json::Error },
    UnsupportedButton(UnsupportedButtonError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed reading config {path}: {source}"),
            Self::Parse { path, source } => write!(f, "failed parsing config {path}: {source}"),
            Self::UnsupportedButton(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnsupportedButton(err) => Some(err),
        }
    }
}

/// Loads and validates preferences from `path`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: AppConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.pan_button().map_err(ConfigError::UnsupportedButton)?;
    Ok(config)
}
