//! Configuration loading and parsing.
//!
//! Parses `harp.toml` (or an override path provided by the binary). Every
//! field has a default so a missing file, a missing table or a missing key all
//! fall back silently. A file that fails to parse also falls back to defaults,
//! but logs a `config` warning so the user can find out why settings were ignored.
//! Unknown fields are ignored to allow forward evolution.
//!
//! ```toml
//! [editor]
//! indent_width = 2          # Tab width until an indent step is observed
//! require_blank_line = false
//!
//! [prompt]
//! line_numbers = true
//! marker = ">"
//! banner = true
//!
//! [scanner]
//! carry_state = false       # carry strings / block comments across lines
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "harp.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_indent_width")]
    pub indent_width: u16,
    /// Only submit on an empty line with balanced brackets.
    #[serde(default)]
    pub require_blank_line: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: Self::default_indent_width(),
            require_blank_line: false,
        }
    }
}

impl EditorConfig {
    const fn default_indent_width() -> u16 {
        2
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_line_numbers")]
    pub line_numbers: bool,
    #[serde(default = "PromptConfig::default_marker")]
    pub marker: String,
    #[serde(default = "PromptConfig::default_banner")]
    pub banner: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            line_numbers: Self::default_line_numbers(),
            marker: Self::default_marker(),
            banner: Self::default_banner(),
        }
    }
}

impl PromptConfig {
    const fn default_line_numbers() -> bool {
        true
    }
    fn default_marker() -> String {
        ">".to_string()
    }
    const fn default_banner() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    #[serde(default)]
    pub carry_state: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File the settings came from; `None` when defaults are in effect.
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a local `harp.toml` in the working directory before the platform config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("harp").join(CONFIG_FILE_NAME);
    }
    // Final fallback relative filename.
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_absent");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            debug!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e.message(),
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Tab width used until an indent step is learned from entered lines.
    pub fn indent_width(&self) -> usize {
        usize::from(self.file.editor.indent_width)
    }
}
