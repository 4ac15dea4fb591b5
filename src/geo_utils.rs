//! Geographic utilities.

use geo::{Distance, Haversine, Point};

/// Great-circle distance between two coordinates in kilometers.
///
/// Symmetric, and zero for coincident points.
///
/// # Example
/// ```
/// use track_landmarks::haversine_distance_km;
///
/// let km = haversine_distance_km(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((km - 343.5).abs() < 1.0); // London to Paris
/// ```
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let point1 = Point::new(lon1, lat1);
    let point2 = Point::new(lon2, lat2);
    Haversine::distance(point1, point2) / 1000.0
}
