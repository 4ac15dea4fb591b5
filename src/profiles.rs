//! # Profiles
//!
//! Loading recorded tracks into profiles, and the track-derived landmark view.
//!
//! Track documents come from a [`TrackSource`], an external collaborator
//! that does the blocking fetch. Loading runs on a background thread and
//! publishes the finished profile list exactly once; readers before that
//! see no profiles rather than blocking.

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::interpolation::interpolate_a;
use crate::parser::parse_track;
use crate::{LandmarkConfig, Place, Profile};

// ============================================================================
// Track Sources
// ============================================================================

/// Supplier of raw track documents, indexed from zero.
///
/// `fetch` may block (network, disk). A failed fetch means the profile for
/// that index is simply missing.
pub trait TrackSource: Send + Sync {
    /// Number of documents this source provides.
    fn document_count(&self) -> usize;

    /// Raw text of document `index`.
    fn fetch(&self, index: usize) -> Result<String>;
}

impl TrackSource for [String] {
    fn document_count(&self) -> usize {
        self.len()
    }

    fn fetch(&self, index: usize) -> Result<String> {
        self.get(index)
            .cloned()
            .ok_or_else(|| crate::TrackError::Fetch {
                index,
                message: "no such document".to_string(),
            })
    }
}

impl TrackSource for Vec<String> {
    fn document_count(&self) -> usize {
        self.as_slice().document_count()
    }

    fn fetch(&self, index: usize) -> Result<String> {
        self.as_slice().fetch(index)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Fetch and parse one document into a profile whose id is its index.
fn load_profile<S: TrackSource + ?Sized>(source: &S, index: usize) -> Option<Profile> {
    let content = match source.fetch(index) {
        Ok(content) => content,
        Err(e) => {
            warn!("[ProfileLoader] Document {}: {}", index, e);
            return None;
        }
    };

    let track = match parse_track(&content) {
        Ok(track) => track,
        Err(e) => {
            warn!("[ProfileLoader] Document {} abandoned: {}", index, e);
            return None;
        }
    };

    if !track.is_time_ordered() {
        warn!("[ProfileLoader] Document {} has out-of-order times", index);
    }

    let Ok(id) = u32::try_from(index) else {
        warn!(
            "[ProfileLoader] Document {} exceeds the profile id range",
            index
        );
        return None;
    };

    let sample_count = track.len();
    match Profile::new(id, track) {
        Some(profile) => {
            debug!(
                "[ProfileLoader] Document {} -> profile {} ({} samples)",
                index, id, sample_count
            );
            Some(profile)
        }
        None => {
            warn!("[ProfileLoader] Document {} has no track points", index);
            None
        }
    }
}

/// Fetch and parse every document of a source, in index order.
///
/// Documents that fail to fetch, fail to parse, or have no points are left
/// out; the others still load. Profile ids are document indices.
pub fn load_profiles<S: TrackSource + ?Sized>(source: &S) -> Vec<Profile> {
    let start = Instant::now();
    let count = source.document_count();

    #[cfg(feature = "parallel")]
    let profiles: Vec<Profile> = (0..count)
        .into_par_iter()
        .filter_map(|index| load_profile(source, index))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let profiles: Vec<Profile> = (0..count)
        .filter_map(|index| load_profile(source, index))
        .collect();

    info!(
        "[ProfileLoader] Loaded {}/{} profiles in {:.2}s",
        profiles.len(),
        count,
        start.elapsed().as_secs_f64()
    );
    profiles
}

// ============================================================================
// Profile Store
// ============================================================================

/// Write-once holder of the loaded profiles.
///
/// Empty until [`ProfileStore::publish`] is called, then immutable.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: OnceCell<Vec<Profile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the full profile list.
    ///
    /// Returns `false` (and drops `profiles`) if a list was already published.
    pub fn publish(&self, profiles: Vec<Profile>) -> bool {
        self.profiles.set(profiles).is_ok()
    }

    /// True once a profile list has been published.
    pub fn is_ready(&self) -> bool {
        self.profiles.get().is_some()
    }

    /// Loaded profiles, or an empty slice before loading completes.
    pub fn profiles(&self) -> &[Profile] {
        self.profiles.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, id: u32) -> Option<&Profile> {
        self.profiles().iter().find(|p| p.id() == id)
    }

    /// Position of every loaded profile at time `t` as a named place.
    ///
    /// One place per profile, named `prefix + id`, positioned with
    /// [`interpolate_a`]. No distance filtering is applied.
    pub fn track_landmarks(&self, t: f64, config: &LandmarkConfig) -> Vec<Place> {
        self.profiles()
            .iter()
            .filter_map(|profile| match interpolate_a(profile.track(), t) {
                Ok(sample) => Some(Place::new(
                    sample.latitude,
                    sample.longitude,
                    format!("{}{}", config.profile_name_prefix, profile.id()),
                )),
                Err(e) => {
                    warn!(
                        "[ProfileStore] Profile {} skipped at t={}: {}",
                        profile.id(),
                        t,
                        e
                    );
                    None
                }
            })
            .collect()
    }
}

// ============================================================================
// Background Loading
// ============================================================================

/// Handle for a background profile load.
///
/// Yields the number of profiles published once the load finishes.
pub struct LoadHandle {
    receiver: mpsc::Receiver<usize>,
}

impl LoadHandle {
    /// Check if loading is complete (non-blocking).
    pub fn try_recv(&self) -> Option<usize> {
        self.receiver.try_recv().ok()
    }

    /// Wait for loading to complete (blocking).
    pub fn recv(self) -> Option<usize> {
        self.receiver.recv().ok()
    }
}

/// Load profiles from `source` on a background thread and publish them to `store`.
///
/// Returns immediately. If the store was already published the new list is
/// discarded and the handle reports the existing count.
pub fn spawn_load<S>(store: Arc<ProfileStore>, source: S) -> LoadHandle
where
    S: TrackSource + 'static,
{
    let (tx, rx) = mpsc::channel();

    info!(
        "[ProfileLoader] Spawning load of {} documents",
        source.document_count()
    );

    thread::spawn(move || {
        let profiles = load_profiles(&source);
        if !store.publish(profiles) {
            warn!("[ProfileLoader] Profiles already published, discarding reload");
        }
        tx.send(store.profiles().len()).ok();
    });

    LoadHandle { receiver: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sample, TrackError};

    fn document(start: &str, points: &[(f64, f64, &str)]) -> String {
        let mut doc = format!("<trk><time>{}</time><trkseg>", start);
        for (lat, lon, time) in points {
            doc.push_str(&format!(
                "<trkpt lat=\"{}\" lon=\"{}\"><time>{}</time></trkpt>",
                lat, lon, time
            ));
        }
        doc.push_str("</trkseg></trk>");
        doc
    }

    fn two_documents() -> Vec<String> {
        vec![
            document(
                "2015-06-19T07:02:00",
                &[(10.0, 20.0, "2015-06-19T07:02:10")],
            ),
            document(
                "2015-07-13T06:51:00",
                &[
                    (0.0, 0.0, "2015-07-13T06:51:00"),
                    (2.0, 4.0, "2015-07-13T06:51:20"),
                ],
            ),
        ]
    }

    /// Source whose second document is unreachable.
    struct FlakySource(Vec<String>);

    impl TrackSource for FlakySource {
        fn document_count(&self) -> usize {
            self.0.len()
        }

        fn fetch(&self, index: usize) -> Result<String> {
            if index == 1 {
                return Err(TrackError::Fetch {
                    index,
                    message: "timed out".to_string(),
                });
            }
            self.0.fetch(index)
        }
    }

    #[test]
    fn test_load_two_documents_in_order() {
        let profiles = load_profiles(&two_documents());
        let ids: Vec<u32> = profiles.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(
            profiles[0].track().samples(),
            &[Sample::new(10.0, 20.0, 10.0)]
        );
        assert_eq!(profiles[1].track().len(), 2);
    }

    #[test]
    fn test_bad_document_does_not_stop_others() {
        let mut docs = two_documents();
        docs.insert(
            1,
            document("2015-06-19T07:02:00", &[(1.0, 1.0, "garbage")]),
        );
        docs.push(document("2015-06-19T07:02:00", &[]));

        let profiles = load_profiles(&docs);
        let ids: Vec<u32> = profiles.iter().map(|p| p.id()).collect();
        // 1 is malformed, 3 has no points
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_fetch_failure_leaves_gap() {
        let mut docs = two_documents();
        docs.push(docs[0].clone());
        let profiles = load_profiles(&FlakySource(docs));
        let ids: Vec<u32> = profiles.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    /// Serves the same document for every index.
    struct RepeatingSource(String);

    impl TrackSource for RepeatingSource {
        fn document_count(&self) -> usize {
            1
        }

        fn fetch(&self, _index: usize) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_index_beyond_id_range_is_skipped() {
        let source = RepeatingSource(two_documents().remove(0));
        assert_eq!(load_profile(&source, 3).map(|p| p.id()), Some(3));

        let max = u32::MAX as usize;
        assert_eq!(load_profile(&source, max).map(|p| p.id()), Some(u32::MAX));
        assert!(load_profile(&source, max + 1).is_none());
    }

    #[test]
    fn test_track_landmarks_skips_empty_track() {
        let store = ProfileStore::new();
        let mut profiles = load_profiles(&two_documents());
        // Bypasses Profile::new, which refuses empty tracks
        profiles.insert(
            0,
            Profile {
                id: 9,
                track: crate::Track::default(),
            },
        );
        store.publish(profiles);

        let names: Vec<String> = store
            .track_landmarks(10.0, &LandmarkConfig::default())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["id0", "id1"]);
    }

    #[test]
    fn test_store_is_empty_before_publish() {
        let store = ProfileStore::new();
        assert!(!store.is_ready());
        assert!(store.profiles().is_empty());
        assert!(store
            .track_landmarks(5.0, &LandmarkConfig::default())
            .is_empty());
    }

    #[test]
    fn test_store_publishes_once() {
        let store = ProfileStore::new();
        assert!(store.publish(load_profiles(&two_documents())));
        assert!(store.is_ready());
        assert!(!store.publish(Vec::new()));
        assert_eq!(store.profiles().len(), 2);
        assert_eq!(store.get(1).map(|p| p.id()), Some(1));
        assert!(store.get(5).is_none());
    }

    #[test]
    fn test_track_landmarks_one_per_profile() {
        let store = ProfileStore::new();
        store.publish(load_profiles(&two_documents()));

        let places = store.track_landmarks(10.0, &LandmarkConfig::default());
        assert_eq!(
            places,
            vec![
                Place::new(10.0, 20.0, "id0"),
                Place::new(1.0, 2.0, "id1"),
            ]
        );

        // Far beyond both tracks: clamped, never filtered out
        let places = store.track_landmarks(9999.0, &LandmarkConfig::default());
        assert_eq!(
            places,
            vec![
                Place::new(10.0, 20.0, "id0"),
                Place::new(2.0, 4.0, "id1"),
            ]
        );
    }

    #[test]
    fn test_track_landmarks_custom_prefix() {
        let store = ProfileStore::new();
        store.publish(load_profiles(&two_documents()));
        let config = LandmarkConfig {
            profile_name_prefix: "runner-".to_string(),
            ..LandmarkConfig::default()
        };
        let names: Vec<String> = store
            .track_landmarks(0.0, &config)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["runner-0", "runner-1"]);
    }

    #[test]
    fn test_spawn_load_publishes() {
        let store = Arc::new(ProfileStore::new());
        let handle = spawn_load(Arc::clone(&store), two_documents());
        assert_eq!(handle.recv(), Some(2));
        assert!(store.is_ready());
        assert_eq!(store.profiles().len(), 2);
    }

    #[test]
    fn test_spawn_load_into_published_store_keeps_first_list() {
        let store = Arc::new(ProfileStore::new());
        store.publish(Vec::new());
        let handle = spawn_load(Arc::clone(&store), two_documents());
        assert_eq!(handle.recv(), Some(0));
        assert!(store.profiles().is_empty());
    }
}
