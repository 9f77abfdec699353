//! Arcade settings and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PARTICLES, SNAPSHOT_INTERVAL_MS};
use crate::persistence::{Storage, StorageError, load_json, save_json};

/// Arcade settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Explosion particle bursts
    pub particles: bool,
    /// Particle pool cap when particles are on
    pub particle_limit: usize,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    /// Scoreboard snapshot cadence in milliseconds
    pub snapshot_interval_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            particle_limit: MAX_PARTICLES,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            snapshot_interval_ms: SNAPSHOT_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "retro_arcade_settings";

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.particle_limit
        }
    }

    /// Volumes clamped to 0.0 - 1.0 and a sane snapshot interval
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if !self.snapshot_interval_ms.is_finite() || self.snapshot_interval_ms < 100.0 {
            self.snapshot_interval_ms = SNAPSHOT_INTERVAL_MS;
        }
        self
    }

    pub fn try_load(storage: &dyn Storage) -> Result<Option<Self>, StorageError> {
        Ok(load_json::<Self>(storage, Self::STORAGE_KEY)?.map(Self::sanitized))
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(storage: &dyn Storage) -> Self {
        match Self::try_load(storage) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from storage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged
    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}
