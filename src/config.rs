use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{LoopAutomaError, LoopAutomaResult};

const CONFIG_FILE: &str = "recorder.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecorderConfig {
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingConfig {
    /// Number of raw events kept for the live timeline. Display only.
    #[serde(default = "default_timeline_capacity")]
    pub timeline_capacity: usize,
    #[serde(default)]
    pub special_keys: SpecialKeyMode,
    #[serde(default)]
    pub key_text: KeyTextSource,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            timeline_capacity: default_timeline_capacity(),
            special_keys: SpecialKeyMode::default(),
            key_text: KeyTextSource::default(),
        }
    }
}

fn default_timeline_capacity() -> usize {
    20
}

/// How non-printable keys end up in the action list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKeyMode {
    /// Appended to the pending text as `{Key:...}` markers.
    #[default]
    Inline,
    /// Flush pending text, then emit a standalone `Key` action.
    Discrete,
}

/// Which keyboard phase carries character data on the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyTextSource {
    #[default]
    KeyDown,
    /// Character text only shows up on the matching key-up.
    LateKeyUp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Fraction of the native screenshot size the recorder window displays.
    #[serde(default = "default_screenshot_scale")]
    pub screenshot_scale: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            screenshot_scale: default_screenshot_scale(),
        }
    }
}

fn default_screenshot_scale() -> f64 {
    0.8
}

fn resolve_config_path() -> LoopAutomaResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("loopautoma").join(CONFIG_FILE);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in user config dir");
            return Ok(candidate);
        }
    }

    Err(LoopAutomaError::Config(format!(
        "{CONFIG_FILE} not found next to executable, in working directory or user config dir"
    )))
}

pub fn parse_config(content: &str) -> LoopAutomaResult<RecorderConfig> {
    let config: RecorderConfig = toml::from_str(content)?;
    let scale = config.preview.screenshot_scale;
    if scale.is_nan() || scale <= 0.0 {
        return Err(LoopAutomaError::Config(format!(
            "preview.screenshot_scale must be positive, got {}",
            config.preview.screenshot_scale
        )));
    }
    Ok(config)
}

pub fn load_config() -> LoopAutomaResult<RecorderConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content)?;
    tracing::info!(
        path = %path.display(),
        special_keys = ?config.recording.special_keys,
        key_text = ?config.recording.key_text,
        "config loaded"
    );
    Ok(config)
}

pub fn save_config(config: &RecorderConfig) -> LoopAutomaResult<()> {
    let path = match resolve_config_path() {
        Ok(path) => path,
        Err(_) => std::env::current_dir()?.join(CONFIG_FILE),
    };
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
