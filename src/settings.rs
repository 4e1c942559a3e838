//! Scene settings
//!
//! Loaded from a JSON file by the driver. Fields missing from the file take
//! the defaults of the selected variant.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_WORLD_SIZE, ASTEROIDS_WORLD_SIZE};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game variant driven by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Wrapping asteroid field
    #[default]
    Asteroids,
    /// Walled arena
    Arena,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Asteroids => "asteroids",
            Variant::Arena => "arena",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asteroids" | "asteroid" => Some(Variant::Asteroids),
            "arena" => Some(Variant::Arena),
            _ => None,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub variant: Variant,
    /// RNG seed; equal seeds and intents replay identically
    pub seed: u64,

    // === World ===
    /// Side length of the square world
    pub world_size: f32,
    /// Side length of the visible window
    pub view_size: f32,
    /// Screen width in pixels the view maps onto
    pub screen_width: f32,

    // === Effects ===
    /// Particle effects (bursts spawn empty when off)
    pub particles: bool,

    // === Driver ===
    /// Enemies placed when the scene is created
    pub initial_enemies: usize,
    /// Frames between scripted enemy waves (0 disables them)
    pub spawn_interval: u64,
    /// Enemies added per scripted wave
    pub spawn_batch: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl Settings {
    /// Per-variant defaults
    pub fn from_variant(variant: Variant) -> Self {
        match variant {
            Variant::Asteroids => Self {
                variant,
                seed: 1,
                world_size: ASTEROIDS_WORLD_SIZE,
                view_size: ASTEROIDS_WORLD_SIZE,
                screen_width: ASTEROIDS_WORLD_SIZE,
                particles: true,
                initial_enemies: 10,
                spawn_interval: 120,
                spawn_batch: 5,
            },
            Variant::Arena => Self {
                variant,
                seed: 1,
                world_size: ARENA_WORLD_SIZE,
                view_size: ARENA_WORLD_SIZE,
                screen_width: 800.0,
                particles: true,
                initial_enemies: 7,
                spawn_interval: 30,
                spawn_batch: 2,
            },
        }
    }

    /// Parse settings, filling gaps from the defaults of the `variant` named
    /// in the document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(SettingsError::Invalid {
                field: "settings",
                reason: "expected a JSON object".to_string(),
            });
        };

        let variant = match overrides.get("variant") {
            Some(value) => Variant::deserialize(value)?,
            None => Variant::default(),
        };
        let mut merged = serde_json::to_value(Self::from_variant(variant))?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }

        let settings: Self = serde_json::from_value(merged)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("world_size", self.world_size),
            ("view_size", self.view_size),
            ("screen_width", self.screen_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        if self.view_size > self.world_size {
            log::warn!(
                "view_size {} exceeds world_size {}; the view will show past the edges",
                self.view_size,
                self.world_size
            );
        }
        Ok(())
    }
}
