//! # Track Landmarks
//!
//! Recorded GPS track interpolation and landmark proximity queries.
//!
//! This library provides:
//! - A single-segment reader for GPX-style track documents
//! - Two interpolation policies for "where was this track at time t"
//! - Great-circle proximity queries over a static list of landmarks
//! - Track-derived landmarks ("where is profile N right now")
//! - Background loading of profiles with a write-once publish
//!
//! ## Features
//!
//! - **`parallel`** - Parse track documents in parallel with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_landmarks::{interpolate_a, parse_track};
//!
//! let gpx = r#"<trk><time>2015-06-19T07:02:00Z</time><trkseg>
//!     <trkpt lat="10.0" lon="20.0"><time>2015-06-19T07:02:10Z</time></trkpt>
//!     <trkpt lat="11.0" lon="21.0"><time>2015-06-19T07:02:20Z</time></trkpt>
//! </trkseg></trk>"#;
//!
//! let track = parse_track(gpx).unwrap();
//! let halfway = interpolate_a(&track, 15.0).unwrap();
//! assert!((halfway.latitude - 10.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// Geographic utilities (great-circle distance)
pub mod geo_utils;
pub use geo_utils::haversine_distance_km;

// Track document parsing
pub mod parser;
pub use parser::parse_track;

// Track interpolation policies
pub mod interpolation;
pub use interpolation::{interpolate_a, interpolate_b, Track};

// Static landmarks and proximity queries
pub mod landmarks;
pub use landmarks::{parse_landmarks_json, LandmarkStore};

// Profiles, track sources and background loading
pub mod profiles;
pub use profiles::{load_profiles, spawn_load, LoadHandle, ProfileStore, TrackSource};

// Process-wide engine (static landmarks + loaded profiles)
pub mod engine;
pub use engine::{init_engine, with_engine, LandmarkEngine, ENGINE};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TrackLandmarksRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// One timestamped coordinate on a track.
///
/// `elapsed_seconds` is relative to the start of the track segment the
/// sample was read from. Samples are plain values: interpolation always
/// hands back a fresh copy, never a reference into a stored track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub elapsed_seconds: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(latitude: f64, longitude: f64, elapsed_seconds: f64) -> Self {
        Self {
            latitude,
            longitude,
            elapsed_seconds,
        }
    }

    /// Copy of this sample re-stamped at `elapsed_seconds`.
    pub fn at(&self, elapsed_seconds: f64) -> Self {
        Self {
            elapsed_seconds,
            ..*self
        }
    }
}

/// A named coordinate of interest, either static or derived from a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl Place {
    /// Create a new place.
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
        }
    }

    /// Check if the place has a name and finite coordinates.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A recorded track with a stable numeric identity.
///
/// The track of a profile always holds at least one sample.
#[derive(Debug, Clone)]
pub struct Profile {
    id: u32,
    track: Track,
}

impl Profile {
    /// Create a profile, or `None` if the track is empty.
    pub fn new(id: u32, track: Track) -> Option<Self> {
        if track.is_empty() {
            return None;
        }
        Some(Self { id, track })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn track(&self) -> &Track {
        &self.track
    }
}

/// Configuration for landmark queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Radius of the proximity query in kilometers (inclusive).
    /// Default: 10.0 km
    pub max_distance_km: f64,

    /// Prefix for the names of track-derived places, followed by the profile id.
    /// Default: "id" (profile 3 becomes "id3")
    pub profile_name_prefix: String,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 10.0,
            profile_name_prefix: "id".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
