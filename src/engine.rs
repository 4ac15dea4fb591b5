//! # Landmark Engine
//!
//! Process-wide state combining the static landmarks with the loaded
//! profiles.
//!
//! ## Architecture
//!
//! The engine is a write-once singleton:
//! - Static landmarks are fixed when the engine is created
//! - Profiles load on a background thread and appear all at once
//! - Queries never block and return empty results until data is there
//!
//! There is no teardown; the engine lives as long as the process.

use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;

use crate::landmarks::LandmarkStore;
use crate::profiles::{spawn_load, LoadHandle, ProfileStore, TrackSource};
use crate::{LandmarkConfig, Place, Profile};

/// Static landmarks plus track-derived landmarks.
#[derive(Debug)]
pub struct LandmarkEngine {
    landmarks: LandmarkStore,
    profiles: Arc<ProfileStore>,
}

impl LandmarkEngine {
    /// Create an engine with the default configuration.
    pub fn new(places: Vec<Place>) -> Self {
        Self::with_config(places, LandmarkConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(places: Vec<Place>, config: LandmarkConfig) -> Self {
        Self::from_store(LandmarkStore::with_config(places, config))
    }

    /// Create an engine around an existing landmark store.
    pub fn from_store(landmarks: LandmarkStore) -> Self {
        Self {
            landmarks,
            profiles: Arc::new(ProfileStore::new()),
        }
    }

    /// Start loading profiles in the background.
    ///
    /// Only the first completed load is kept.
    pub fn start_loading<S>(&self, source: S) -> LoadHandle
    where
        S: TrackSource + 'static,
    {
        spawn_load(Arc::clone(&self.profiles), source)
    }

    /// True once profiles have been loaded.
    pub fn is_ready(&self) -> bool {
        self.profiles.is_ready()
    }

    pub fn config(&self) -> &LandmarkConfig {
        self.landmarks.config()
    }

    pub fn landmarks(&self) -> &LandmarkStore {
        &self.landmarks
    }

    pub fn profiles(&self) -> &[Profile] {
        self.profiles.profiles()
    }

    /// Static landmarks within the configured radius of a coordinate.
    pub fn nearby_landmarks(&self, latitude: f64, longitude: f64) -> Vec<Place> {
        self.landmarks.nearby(latitude, longitude)
    }

    /// Where every loaded profile is at time `t`.
    pub fn track_landmarks(&self, t: f64) -> Vec<Place> {
        self.profiles.track_landmarks(t, self.landmarks.config())
    }
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance, set once by [`init_engine`].
pub static ENGINE: OnceCell<LandmarkEngine> = OnceCell::new();

/// Install the global engine.
///
/// Returns `false` if an engine was already installed; the first one stays.
pub fn init_engine(engine: LandmarkEngine) -> bool {
    let installed = ENGINE.set(engine).is_ok();
    if installed {
        info!("[LandmarkEngine] Initialized");
    }
    installed
}

/// Run `f` against the global engine, or `None` before [`init_engine`].
pub fn with_engine<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&LandmarkEngine) -> R,
{
    ENGINE.get().map(f)
}
