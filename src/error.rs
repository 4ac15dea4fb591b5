//! Unified error handling for the track-landmarks library.
//!
//! Parse errors abandon the document they came from; they never abort a
//! load of several documents. Interpolation only fails on an empty track.

use thiserror::Error;

/// Unified error type for track-landmarks operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// A point appeared before the segment's reference timestamp
    #[error("Track point found before the segment start time")]
    MissingStartTime,

    /// Timestamp does not match YYYY-MM-DDTHH:MM:SS
    #[error("Invalid timestamp '{value}', expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp { value: String },

    /// Coordinate value is not a number
    #[error("Invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A point closed without one of its required fields
    #[error("Track point is missing its {field}")]
    MissingField { field: &'static str },

    /// Document ended where a value was expected
    #[error("Document ended while reading {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Interpolation requested on a track with no samples
    #[error("Cannot interpolate an empty track")]
    EmptyTrack,

    /// A track document could not be delivered by its source
    #[error("Failed to fetch track document {index}: {message}")]
    Fetch { index: usize, message: String },

    /// Landmark resource is not valid JSON
    #[error("Could not parse landmarks JSON: {message}")]
    LandmarkJson { message: String },
}

impl TrackError {
    /// True for errors raised while reading a track document.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            TrackError::MissingStartTime
                | TrackError::InvalidTimestamp { .. }
                | TrackError::InvalidNumber { .. }
                | TrackError::MissingField { .. }
                | TrackError::UnexpectedEnd { .. }
        )
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(e: serde_json::Error) -> Self {
        TrackError::LandmarkJson {
            message: e.to_string(),
        }
    }
}

/// Result type alias for track-landmarks operations.
pub type Result<T> = std::result::Result<T, TrackError>;
