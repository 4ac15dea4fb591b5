//! FFI bindings for mobile platforms (iOS/Android).
//!
//! Thin wrappers over the global [`crate::ENGINE`]. Every query is safe to
//! call before `engine_init` and returns empty results until data is loaded.

use log::{info, warn};

use crate::engine::{init_engine, with_engine, LandmarkEngine};
use crate::landmarks::parse_landmarks_json;
use crate::Place;

/// Initialize the engine (call once at app startup).
///
/// `landmarks_json` is the bundled landmarks resource; `track_documents`
/// are already-fetched track documents, loaded in the background. Returns
/// `false` if the engine was already initialized.
#[uniffi::export]
pub fn engine_init(landmarks_json: String, track_documents: Vec<String>) -> bool {
    crate::init_logging();

    let places = match parse_landmarks_json(&landmarks_json) {
        Ok(places) => places,
        Err(e) => {
            warn!("[LandmarkEngine] {}", e);
            Vec::new()
        }
    };

    if !init_engine(LandmarkEngine::new(places)) {
        warn!("[LandmarkEngine] Already initialized");
        return false;
    }

    info!(
        "[LandmarkEngine] Loading {} track documents",
        track_documents.len()
    );
    with_engine(|e| {
        // Completion is observed through engine_is_ready
        drop(e.start_loading(track_documents));
    });
    true
}

/// Whether track profiles have finished loading.
#[uniffi::export]
pub fn engine_is_ready() -> bool {
    with_engine(|e| e.is_ready()).unwrap_or(false)
}

/// Static landmarks near a coordinate.
#[uniffi::export]
pub fn engine_nearby_landmarks(latitude: f64, longitude: f64) -> Vec<Place> {
    with_engine(|e| e.nearby_landmarks(latitude, longitude)).unwrap_or_default()
}

/// Position of every loaded profile at `t` seconds into its track.
#[uniffi::export]
pub fn engine_track_landmarks(t: f64) -> Vec<Place> {
    with_engine(|e| e.track_landmarks(t)).unwrap_or_default()
}
