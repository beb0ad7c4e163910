//! Driver settings and preferences
//!
//! Loaded from a JSON file. Anything missing falls back to its default.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BOARD_SIZE;
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board size must be between 2 and 16, got {0}")]
    BoardSize(usize),
}

/// Animation speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPreset {
    /// Tiles jump straight to their cells
    Instant,
    #[default]
    Normal,
    Relaxed,
}

impl AnimationPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationPreset::Instant => "Instant",
            AnimationPreset::Normal => "Normal",
            AnimationPreset::Relaxed => "Relaxed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "instant" | "off" => Some(AnimationPreset::Instant),
            "normal" => Some(AnimationPreset::Normal),
            "relaxed" | "slow" => Some(AnimationPreset::Relaxed),
            _ => None,
        }
    }

    /// Slide speed in pixels per tick
    pub fn move_speed(&self) -> f32 {
        match self {
            AnimationPreset::Instant => f32::INFINITY,
            AnimationPreset::Normal => 50.0,
            AnimationPreset::Relaxed => 25.0,
        }
    }

    /// (grow, pop) frame counts
    pub fn pop_in_frames(&self) -> (u32, u32) {
        match self {
            AnimationPreset::Instant => (1, 0),
            AnimationPreset::Normal => (3, 5),
            AnimationPreset::Relaxed => (6, 10),
        }
    }
}

/// Driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid dimension
    pub board_size: usize,
    /// Fixed seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Let the bot play
    pub autoplay: bool,
    /// Stop the driver after this many ticks (0 = run to game over)
    pub max_ticks: u64,
    pub animation: AnimationPreset,
    /// Chance of spawning a 4
    pub four_chance: f64,
    /// Pixel geometry
    pub tile_size: f32,
    pub gap_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let tuning = Tuning::default();
        Self {
            board_size: BOARD_SIZE,
            seed: None,
            autoplay: true,
            max_ticks: 0,
            animation: AnimationPreset::Normal,
            four_chance: tuning.four_chance,
            tile_size: tuning.tile_size,
            gap_size: tuning.gap_size,
        }
    }
}

impl Settings {
    /// Create settings from an animation preset
    pub fn from_preset(preset: AnimationPreset) -> Self {
        let mut settings = Self::default();
        settings.animation = preset;
        settings
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(2..=16).contains(&self.board_size) {
            return Err(SettingsError::BoardSize(self.board_size));
        }
        Ok(())
    }

    /// Tuning derived from the preset plus overrides
    pub fn tuning(&self) -> Tuning {
        let (grow_frames, pop_frames) = self.animation.pop_in_frames();
        Tuning {
            tile_size: self.tile_size,
            gap_size: self.gap_size,
            move_speed: self.animation.move_speed(),
            grow_frames,
            pop_frames,
            four_chance: self.four_chance,
        }
    }

    /// Configured seed, or one derived from the clock
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
                .unwrap_or(0)
        })
    }
}
