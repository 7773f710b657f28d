//! Game settings and preferences
//!
//! Read from a JSON file next to the binary (`lasertrap.json`), or from the
//! path in `LASERTRAP_SETTINGS`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::sim::LevelSetup;

/// Default settings file name
pub const SETTINGS_FILE: &str = "lasertrap.json";
/// Environment variable overriding the settings path
pub const SETTINGS_ENV: &str = "LASERTRAP_SETTINGS";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: u32,
    pub window_height: u32,
    /// Wait for vblank when presenting
    pub vsync: bool,

    // === Level ===
    /// Directory holding `level<N>/` folders
    pub levels_dir: PathBuf,
    /// Level number to load
    pub level: u32,
    /// Thief spawn tile (col, row)
    pub spawn: (usize, usize),
    /// Mirrors the thief starts with
    pub initial_mirrors: u32,
    /// Fixed RNG seed; derived from the clock when absent
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Flickering laser beams
    pub noisy_lasers: bool,
    /// Pulsing placed mirrors
    pub fading_mirrors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,
            vsync: true,

            levels_dir: PathBuf::from("resources"),
            level: 1,
            spawn: (2, 6),
            initial_mirrors: 3,
            seed: None,

            // Visual effects - all on by default
            noisy_lasers: true,
            fading_mirrors: true,
        }
    }
}

impl Settings {
    /// Settings path, honouring the environment override
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Configured seed, or one taken from the clock
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        })
    }

    /// Level build parameters for a given tile size
    pub fn level_setup(&self, unit: f32) -> LevelSetup {
        LevelSetup {
            unit,
            seed: self.resolved_seed(),
            mirrors: self.initial_mirrors,
            spawn: self.spawn,
        }
    }
}
