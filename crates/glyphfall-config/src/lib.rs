//! Configuration for the glyphfall page animator.
//!
//! Settings are read from `config.toml` in the platform config directory.
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glyphfall_core::{Millis, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that forces the reduced-motion preference.
pub const REDUCED_MOTION_ENV: &str = "GLYPHFALL_REDUCED_MOTION";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("typing.phrases must contain at least one phrase")]
    NoPhrases,
    #[error("rain.column_width must be greater than zero")]
    ZeroColumnWidth,
    #[error("rain.glyphs must contain at least one character")]
    NoGlyphs,
    #[error("reveal.threshold must be in (0, 1], got {0}")]
    Threshold(f32),
    #[error("reveal.bottom_margin must be in [0, 1), got {0}")]
    BottomMargin(f32),
    #[error("rain.trail_alpha must be in [0, 1], got {0}")]
    TrailAlpha(f32),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the detected reduced-motion preference when set.
    pub reduced_motion: Option<bool>,
    /// Fallback for the `--font-mono` style property.
    pub font_family: String,
    pub boot: BootConfig,
    pub typing: TypingConfig,
    pub rain: RainConfig,
    pub reveal: RevealConfig,
    pub hover: HoverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reduced_motion: None,
            font_family: "monospace".to_string(),
            boot: BootConfig::default(),
            typing: TypingConfig::default(),
            rain: RainConfig::default(),
            reveal: RevealConfig::default(),
            hover: HoverConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Time the splash stays up before finishing.
    pub delay_ms: Millis,
    /// Opacity transition of the overlay.
    pub fade_ms: Millis,
    /// Time after finish at which the overlay is removed.
    pub remove_after_ms: Millis,
    /// Status text shown once boot finishes.
    pub ready_text: String,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1800,
            fade_ms: 360,
            remove_after_ms: 380,
            ready_text: "ready".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_ms: Millis,
    /// Hold at full length before deleting.
    pub pause_ms: Millis,
    pub delete_ms: Millis,
    /// Hold on the empty line before the next phrase.
    pub next_phrase_ms: Millis,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "compile --mind --opt-level=O2",
                "analyze --data-structures graph stack queue",
                "link --ideas --memory=RAII",
                "emit bytecode --target=experience",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_ms: 36,
            pause_ms: 800,
            delete_ms: 20,
            next_phrase_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Width of one rain column in pixels.
    pub column_width: u32,
    pub font_size_px: u16,
    /// Fall speed of column 0 in px/s.
    pub base_speed: f32,
    /// Extra px/s per step of column variation.
    pub speed_step: f32,
    /// Column speeds repeat with this period.
    pub speed_period: u32,
    /// Columns re-enter from up to this many pixels above the top.
    pub reset_span: f32,
    pub trail_color: Rgb,
    /// Opacity of the per-frame fade overlay.
    pub trail_alpha: f32,
    pub glyph_color: Rgb,
    pub glyphs: Vec<char>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            column_width: 16,
            font_size_px: 14,
            base_speed: 40.0,
            speed_step: 6.0,
            speed_period: 7,
            reset_span: 80.0,
            trail_color: Rgb::new(6, 17, 11),
            trail_alpha: 0.08,
            glyph_color: Rgb::new(0x21, 0xff, 0x6a),
            glyphs: vec!['0', '1'],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Minimum visible fraction that triggers a reveal.
    pub threshold: f32,
    /// Fraction of the viewport height excluded at the bottom.
    pub bottom_margin: f32,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 0.1,
            class: "in-view".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub class: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            class: "alive".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "glyphfall", "glyphfall")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the animator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        if self.rain.column_width == 0 {
            return Err(ConfigError::ZeroColumnWidth);
        }
        if self.rain.glyphs.is_empty() {
            return Err(ConfigError::NoGlyphs);
        }
        if !(self.rain.trail_alpha >= 0.0 && self.rain.trail_alpha <= 1.0) {
            return Err(ConfigError::TrailAlpha(self.rain.trail_alpha));
        }
        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(ConfigError::Threshold(self.reveal.threshold));
        }
        if !(self.reveal.bottom_margin >= 0.0 && self.reveal.bottom_margin < 1.0) {
            return Err(ConfigError::BottomMargin(self.reveal.bottom_margin));
        }
        Ok(())
    }

    /// Resolve the reduced-motion flag: environment, then file, then the
    /// host's detected value.
    pub fn reduced_motion(&self, detected: bool) -> bool {
        let env = std::env::var(REDUCED_MOTION_ENV).ok();
        self.resolve_reduced_motion(env.as_deref(), detected)
    }

    fn resolve_reduced_motion(&self, env: Option<&str>, detected: bool) -> bool {
        env.and_then(parse_flag)
            .or(self.reduced_motion)
            .unwrap_or(detected)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "reduce" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
