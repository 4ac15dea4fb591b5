//! # Landmark Store
//!
//! A fixed list of named places with great-circle proximity queries.
//!
//! The list is set once at construction and never mutated afterwards, so
//! queries need no synchronization.

use log::{debug, info};
use serde_json::Value;

use crate::error::Result;
use crate::geo_utils::haversine_distance_km;
use crate::{LandmarkConfig, Place};

/// Static landmarks available for proximity queries.
#[derive(Debug, Clone, Default)]
pub struct LandmarkStore {
    places: Vec<Place>,
    config: LandmarkConfig,
}

impl LandmarkStore {
    /// Create a store with the default configuration (10 km radius).
    pub fn new(places: Vec<Place>) -> Self {
        Self::with_config(places, LandmarkConfig::default())
    }

    /// Create a store with a custom configuration.
    pub fn with_config(places: Vec<Place>, config: LandmarkConfig) -> Self {
        info!("[LandmarkStore] Holding {} landmarks", places.len());
        Self { places, config }
    }

    /// Create a store from a landmarks JSON resource.
    ///
    /// See [`parse_landmarks_json`] for the expected layout.
    pub fn from_json(json: &str, config: LandmarkConfig) -> Result<Self> {
        Ok(Self::with_config(parse_landmarks_json(json)?, config))
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn config(&self) -> &LandmarkConfig {
        &self.config
    }

    /// All landmarks within the configured radius of a coordinate.
    ///
    /// The radius is inclusive and the store's ordering is kept. An empty
    /// list means nothing is nearby.
    pub fn nearby(&self, latitude: f64, longitude: f64) -> Vec<Place> {
        let nearby: Vec<Place> = self
            .places
            .iter()
            .filter(|place| {
                haversine_distance_km(latitude, longitude, place.latitude, place.longitude)
                    <= self.config.max_distance_km
            })
            .cloned()
            .collect();

        debug!(
            "[LandmarkStore] {} of {} landmarks within {} km of ({}, {})",
            nearby.len(),
            self.places.len(),
            self.config.max_distance_km,
            latitude,
            longitude
        );
        nearby
    }
}

/// Parse a landmarks resource.
///
/// The root object holds a `landmarks` array of objects with `name`,
/// `latitude` and `longitude`. Entries without a non-empty name or with
/// non-numeric or non-finite coordinates are dropped. A missing array gives
/// an empty list.
///
/// # Errors
/// [`crate::TrackError::LandmarkJson`] if the text is not valid JSON.
///
/// # Example
/// ```
/// use track_landmarks::parse_landmarks_json;
///
/// let places = parse_landmarks_json(
///     r#"{"landmarks": [{"name": "Marco Zero", "latitude": -8.0631, "longitude": -34.8711}]}"#,
/// ).unwrap();
/// assert_eq!(places[0].name, "Marco Zero");
/// ```
pub fn parse_landmarks_json(json: &str) -> Result<Vec<Place>> {
    let root: Value = serde_json::from_str(json)?;

    let entries = match root.get("landmarks").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Ok(Vec::new()),
    };

    let places: Vec<Place> = entries.iter().filter_map(place_from_json).collect();
    if places.len() < entries.len() {
        debug!(
            "[LandmarkStore] Dropped {} invalid landmark entries",
            entries.len() - places.len()
        );
    }
    Ok(places)
}

fn place_from_json(entry: &Value) -> Option<Place> {
    let name = entry.get("name")?.as_str()?;
    let latitude = entry.get("latitude")?.as_f64()?;
    let longitude = entry.get("longitude")?.as_f64()?;

    let place = Place::new(latitude, longitude, name);
    place.is_valid().then_some(place)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Recife, roughly along Avenida Boa Viagem
    fn recife_places() -> Vec<Place> {
        vec![
            Place::new(-8.0631, -34.8711, "Marco Zero"),
            Place::new(-8.1190, -34.9000, "Boa Viagem"),
            Place::new(-7.9986, -34.8450, "Olinda"),
            Place::new(-8.2840, -35.0350, "Cabo"),
        ]
    }

    #[test]
    fn test_nearby_filters_by_distance_and_keeps_order() {
        let store = LandmarkStore::new(recife_places());
        let nearby = store.nearby(-8.0631, -34.8711);

        let names: Vec<&str> = nearby.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Marco Zero", "Boa Viagem", "Olinda"]);

        for place in &nearby {
            let km = haversine_distance_km(-8.0631, -34.8711, place.latitude, place.longitude);
            assert!(km <= 10.0);
        }
    }

    #[test]
    fn test_nearby_boundary_is_inclusive() {
        let origin = (0.0, 0.0);
        let edge = Place::new(0.0, 1.0, "edge");
        let radius = haversine_distance_km(origin.0, origin.1, edge.latitude, edge.longitude);

        let config = LandmarkConfig {
            max_distance_km: radius,
            ..LandmarkConfig::default()
        };
        let store = LandmarkStore::with_config(vec![edge.clone()], config);
        assert_eq!(store.nearby(origin.0, origin.1), vec![edge]);

        let config = LandmarkConfig {
            max_distance_km: radius - 1e-6,
            ..LandmarkConfig::default()
        };
        let store = LandmarkStore::with_config(store.places().to_vec(), config);
        assert!(store.nearby(origin.0, origin.1).is_empty());
    }

    #[test]
    fn test_nearby_empty_store() {
        let store = LandmarkStore::default();
        assert!(store.is_empty());
        assert!(store.nearby(51.5, -0.12).is_empty());
    }

    #[test]
    fn test_parse_landmarks_json_drops_invalid_entries() {
        let json = r#"{
            "landmarks": [
                {"name": "Marco Zero", "latitude": -8.0631, "longitude": -34.8711},
                {"name": "", "latitude": 1.0, "longitude": 1.0},
                {"latitude": 1.0, "longitude": 1.0},
                {"name": "No latitude", "longitude": 1.0},
                {"name": "Text latitude", "latitude": "north", "longitude": 1.0},
                "not an object",
                {"name": "Olinda", "latitude": -7.9986, "longitude": -34.8450}
            ]
        }"#;
        let places = parse_landmarks_json(json).unwrap();
        let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Marco Zero", "Olinda"]);
    }

    #[test]
    fn test_parse_landmarks_json_without_array() {
        assert!(parse_landmarks_json(r#"{"places": []}"#).unwrap().is_empty());
        assert!(parse_landmarks_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_landmarks_json_malformed() {
        assert!(matches!(
            parse_landmarks_json("{\"landmarks\": ["),
            Err(crate::TrackError::LandmarkJson { .. })
        ));
    }

    #[test]
    fn test_store_from_json() {
        let store = LandmarkStore::from_json(
            r#"{"landmarks": [{"name": "Cabo", "latitude": -8.2840, "longitude": -35.0350}]}"#,
            LandmarkConfig::default(),
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.config().max_distance_km, 10.0);
    }
}
