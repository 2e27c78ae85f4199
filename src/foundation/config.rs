use std::{path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    foundation::error::{SignageError, SignageResult},
    layout::mapper::ScaleMode,
};

/// Delay before a failed playlist item is skipped.
pub const DEFAULT_ERROR_SKIP_DELAY_MS: u64 = 1000;
/// Slide duration used when an image carries no usable duration.
pub const DEFAULT_SLIDE_SECONDS: f64 = 5.0;
/// Publish code generation attempts before giving up.
pub const DEFAULT_PUBLISH_CODE_ATTEMPTS: u32 = 10;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Tunable engine policy.
///
/// Every field has a default, so an empty JSON object is a complete configuration.
pub struct EngineConfig {
    /// Milliseconds between a playlist item failing and the skip to the next item.
    pub error_skip_delay_ms: u64,
    /// Fallback slide duration in seconds.
    pub default_slide_seconds: f64,
    /// Maximum publish code attempts.
    pub publish_code_attempts: u32,
    /// How the composer maps canvas units onto the screen.
    pub scale_mode: ScaleMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_skip_delay_ms: DEFAULT_ERROR_SKIP_DELAY_MS,
            default_slide_seconds: DEFAULT_SLIDE_SECONDS,
            publish_code_attempts: DEFAULT_PUBLISH_CODE_ATTEMPTS,
            scale_mode: ScaleMode::Percent,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(s: &str) -> SignageResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| SignageError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> SignageResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> SignageResult<()> {
        if self.error_skip_delay_ms == 0 {
            return Err(SignageError::config("error_skip_delay_ms must be >= 1"));
        }
        if !self.default_slide_seconds.is_finite() || self.default_slide_seconds <= 0.0 {
            return Err(SignageError::config(
                "default_slide_seconds must be finite and > 0",
            ));
        }
        if self.publish_code_attempts == 0 {
            return Err(SignageError::config("publish_code_attempts must be >= 1"));
        }
        self.scale_mode
            .validate()
            .map_err(|e| SignageError::config(e.to_string()))?;
        Ok(())
    }

    pub fn error_skip_delay(&self) -> Duration {
        Duration::from_millis(self.error_skip_delay_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
