//! # Track Interpolation
//!
//! Two policies answer "where was this track at time t". They agree inside
//! the track but differ at the edges, and both are kept as separate
//! operations:
//!
//! | query time            | [`interpolate_a`]      | [`interpolate_b`]       |
//! |-----------------------|------------------------|-------------------------|
//! | equal to a sample     | that sample            | that sample             |
//! | between two samples   | linear blend           | linear blend            |
//! | after the last sample | last sample's position | last sample's position  |
//! | before the first      | last sample's position | first sample's position |
//!
//! The returned sample is always a new value stamped with the query time;
//! stored samples are never modified.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::Sample;

/// An ordered sequence of samples from one recording segment.
///
/// Samples are expected in non-decreasing `elapsed_seconds` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    samples: Vec<Sample>,
}

impl Track {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the last sample, if any.
    pub fn duration(&self) -> Option<f64> {
        self.samples.last().map(|s| s.elapsed_seconds)
    }

    /// Check that sample times never decrease.
    pub fn is_time_ordered(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].elapsed_seconds <= w[1].elapsed_seconds)
    }
}

impl From<Vec<Sample>> for Track {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

/// Linear blend of the coordinates of two samples, stamped at `t`.
fn blend(previous: &Sample, current: &Sample, fraction: f64, t: f64) -> Sample {
    Sample::new(
        previous.latitude + fraction * (current.latitude - previous.latitude),
        previous.longitude + fraction * (current.longitude - previous.longitude),
        t,
    )
}

/// Bracket-then-blend interpolation.
///
/// Walks the track keeping the previous and current sample. An exact time
/// match returns that sample; the first pair bracketing `t` is blended.
/// If no pair brackets `t` the last sample's position is returned, which
/// also covers `t` before the start of the track.
///
/// # Errors
/// [`TrackError::EmptyTrack`] if the track has no samples.
///
/// # Example
/// ```
/// use track_landmarks::{interpolate_a, Sample, Track};
///
/// let track = Track::new(vec![Sample::new(0.0, 0.0, 0.0), Sample::new(10.0, 20.0, 10.0)]);
/// assert_eq!(interpolate_a(&track, 5.0).unwrap(), Sample::new(5.0, 10.0, 5.0));
/// assert_eq!(interpolate_a(&track, 99.0).unwrap(), Sample::new(10.0, 20.0, 99.0));
/// ```
pub fn interpolate_a(track: &Track, t: f64) -> Result<Sample> {
    let samples = track.samples();
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(TrackError::EmptyTrack),
    };

    let mut current = first;
    for sample in samples {
        let previous = current;
        current = sample;

        if current.elapsed_seconds == t {
            return Ok(*current);
        }
        if previous.elapsed_seconds <= t && t <= current.elapsed_seconds {
            let fraction = (t - previous.elapsed_seconds)
                / (current.elapsed_seconds - previous.elapsed_seconds);
            return Ok(blend(previous, current, fraction, t));
        }
    }

    Ok(last.at(t))
}

/// Forward-search-then-divide interpolation.
///
/// Finds the first sample later than `t` and blends from the sample just
/// before it. Before the start both ends are the first sample, past the end
/// both are the last, so the result clamps to the boundary position. A zero
/// time span between the two is not divided by.
///
/// # Errors
/// [`TrackError::EmptyTrack`] if the track has no samples.
///
/// # Example
/// ```
/// use track_landmarks::{interpolate_b, Sample, Track};
///
/// let track = Track::new(vec![Sample::new(0.0, 0.0, 10.0), Sample::new(10.0, 20.0, 20.0)]);
/// assert_eq!(interpolate_b(&track, 15.0).unwrap(), Sample::new(5.0, 10.0, 15.0));
/// assert_eq!(interpolate_b(&track, -5.0).unwrap(), Sample::new(0.0, 0.0, -5.0));
/// ```
pub fn interpolate_b(track: &Track, t: f64) -> Result<Sample> {
    let samples = track.samples();
    let mut previous = samples.first().ok_or(TrackError::EmptyTrack)?;
    let mut next = None;

    for sample in samples {
        if sample.elapsed_seconds == t {
            return Ok(*sample);
        }
        if sample.elapsed_seconds > t {
            next = Some(sample);
            break;
        }
        previous = sample;
    }

    let current = next.unwrap_or(previous);
    let mut delta = t - previous.elapsed_seconds;
    let span = current.elapsed_seconds - previous.elapsed_seconds;
    if span != 0.0 {
        delta /= span;
    }

    Ok(blend(previous, current, delta, t))
}
