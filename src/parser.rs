//! # Track Parser
//!
//! A simplified, single-segment reader for GPX-style track documents.
//!
//! The document is not parsed as XML. It is split into tokens on whitespace
//! and the characters `=`, `<`, `>` and `"`, and three markers are recognized:
//!
//! - `trk`: the next `time` value is the segment's reference timestamp
//! - `trkpt`: a point, read up to `/trkpt`, carrying `lat`, `lon` and `time`
//! - `/trkseg`: end of the first segment; anything after it is ignored
//!
//! Every point becomes a [`Sample`] whose elapsed time is the point's
//! timestamp minus the reference timestamp, in whole seconds. Any parse
//! error abandons the whole document.

use chrono::NaiveDateTime;
use log::{debug, trace};

use crate::error::{Result, TrackError};
use crate::interpolation::Track;
use crate::Sample;

/// Literal timestamp format; trailing text such as `Z` is ignored.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIMESTAMP_LEN: usize = 19;

const SEGMENT_START: &str = "trk";
const POINT_START: &str = "trkpt";
const POINT_END: &str = "/trkpt";
const SEGMENT_END: &str = "/trkseg";

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '=' | '<' | '>' | '"')
}

/// Split a document into non-empty tokens.
fn tokenize(content: &str) -> impl Iterator<Item = &str> {
    content.split(is_delimiter).filter(|token| !token.is_empty())
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` timestamp prefix.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    value
        .get(..TIMESTAMP_LEN)
        .and_then(|prefix| NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok())
        .ok_or_else(|| TrackError::InvalidTimestamp {
            value: value.to_string(),
        })
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| TrackError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn next_value<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> Result<&'a str> {
    tokens.next().ok_or(TrackError::UnexpectedEnd { expected })
}

/// Parse the first track segment of a document.
///
/// Returns an empty track when the document has no points; that is a valid
/// result, not an error.
///
/// # Errors
/// - [`TrackError::MissingStartTime`] if a point precedes the segment time
/// - [`TrackError::InvalidTimestamp`] for a malformed timestamp
/// - [`TrackError::InvalidNumber`] for a malformed `lat`/`lon`
/// - [`TrackError::MissingField`] for a point without `lat`, `lon` or `time`
/// - [`TrackError::UnexpectedEnd`] if the document stops mid-field
///
/// # Example
/// ```
/// use track_landmarks::{parse_track, Sample};
///
/// let doc = r#"<trk><time>2015-06-19T07:02:00</time><trkseg>
///   <trkpt lat="10.0" lon="20.0"><time>2015-06-19T07:02:10</time></trkpt>
/// </trkseg></trk>"#;
///
/// let track = parse_track(doc).unwrap();
/// assert_eq!(track.samples(), &[Sample::new(10.0, 20.0, 10.0)]);
/// ```
pub fn parse_track(content: &str) -> Result<Track> {
    let mut tokens = tokenize(content);
    let mut start: Option<NaiveDateTime> = None;
    let mut samples = Vec::new();

    'document: while let Some(token) = tokens.next() {
        match token {
            SEGMENT_START => {
                // The segment's own time field comes before its first point
                while let Some(field) = tokens.next() {
                    match field {
                        "time" => {
                            let value = next_value(&mut tokens, "segment time")?;
                            start = Some(parse_timestamp(value)?);
                            debug!("[TrackParser] Segment starts at {}", value);
                            break;
                        }
                        POINT_START => return Err(TrackError::MissingStartTime),
                        SEGMENT_END => break 'document,
                        _ => {}
                    }
                }
            }
            POINT_START => {
                if let Some(sample) = parse_point(&mut tokens, start)? {
                    trace!("[TrackParser] Point {:?}", sample);
                    samples.push(sample);
                }
            }
            SEGMENT_END => break,
            _ => {}
        }
    }

    debug!("[TrackParser] Parsed {} points", samples.len());
    Ok(Track::new(samples))
}

/// Read one point up to its end marker.
///
/// Returns `None` if the document ends before the point is closed.
fn parse_point<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    start: Option<NaiveDateTime>,
) -> Result<Option<Sample>> {
    let mut lat = None;
    let mut lon = None;
    let mut elapsed = None;

    while let Some(field) = tokens.next() {
        match field {
            "lat" => lat = Some(parse_coordinate("lat", next_value(tokens, "lat")?)?),
            "lon" => lon = Some(parse_coordinate("lon", next_value(tokens, "lon")?)?),
            "time" => {
                let value = next_value(tokens, "point time")?;
                let start = start.ok_or(TrackError::MissingStartTime)?;
                let at = parse_timestamp(value)?;
                elapsed = Some((at - start).num_seconds() as f64);
            }
            POINT_END => {
                let latitude = lat.ok_or(TrackError::MissingField { field: "lat" })?;
                let longitude = lon.ok_or(TrackError::MissingField { field: "lon" })?;
                let elapsed_seconds = elapsed.ok_or(TrackError::MissingField { field: "time" })?;
                return Ok(Some(Sample::new(latitude, longitude, elapsed_seconds)));
            }
            _ => {}
        }
    }

    Ok(None)
}
