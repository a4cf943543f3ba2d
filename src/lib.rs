//! # Trackrec
//!
//! GPS activity recording engine for fitness applications.
//!
//! This library provides:
//! - A lifecycle state machine for activity recording (start / pause /
//!   resume / lap / stop)
//! - Incremental distance, moving-time and speed aggregation, for the whole
//!   activity and per lap
//! - Pause/resume that excludes unmonitored gaps from the accumulated metrics
//! - Pluggable track persistence through the [`TrackSink`] trait
//!
//! ## Features
//!
//! - **`gpx`** (default) - GPX file output via [`GpxSink`]
//! - **`synthetic`** - Seeded synthetic ride generation for demos and tests
//! - **`cli`** - The `trackrec-cli` replay/record binary
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trackrec::{GpsPoint, MemorySink, RecordingSession, Sample};
//!
//! let mut session = RecordingSession::new(MemorySink::new());
//! let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
//!
//! session.start(t0).unwrap();
//! session.accept(Sample::new(GpsPoint::new(51.5074, -0.1278), t0));
//! session.accept(Sample::new(
//!     GpsPoint::new(51.5084, -0.1278),
//!     t0 + chrono::Duration::seconds(10),
//! ));
//! session.stop().unwrap();
//!
//! let totals = session.totals().unwrap();
//! assert!(totals.distance_meters > 100.0);
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{RecordingError, Result};

// Geographic and temporal primitives (distance, bearing, elapsed time)
pub mod geo;

// Per-segment metric aggregation
pub mod accumulator;
pub use accumulator::{SegmentAccumulator, SegmentSummary};

// Recording lifecycle state machine
pub mod session;
pub use session::{AcceptOutcome, RecordingSession, RejectReason, SessionState};

// Sample producers (replay, live)
pub mod source;
pub use source::{ReplaySource, SampleSource};

// Track persistence boundary
pub mod sink;
pub use sink::{MemorySink, NullSink, TrackSink};

// GPX file output
#[cfg(feature = "gpx")]
pub mod gpx_sink;
#[cfg(feature = "gpx")]
pub use gpx_sink::GpxSink;

// Synthetic ride generation for demos and stress input
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use trackrec::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters, when the fix provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Estimated horizontal accuracy in meters, when the fix provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl GpsPoint {
    /// Create a new GPS point without elevation or accuracy.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            accuracy: None,
        }
    }

    /// Create a new GPS point with elevation.
    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: Some(elevation),
            accuracy: None,
        }
    }

    /// Check if the point has finite, in-range coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One positioning fix: where the object was, and when.
///
/// Samples are ephemeral - the engine uses them to advance accumulator
/// totals and forwards them to the [`TrackSink`], but does not retain them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub point: GpsPoint,
    pub time: DateTime<Utc>,
}

impl Sample {
    pub fn new(point: GpsPoint, time: DateTime<Utc>) -> Self {
        Self { point, time }
    }
}

/// The per-sample increment applied to an accumulator.
///
/// Returned from [`SegmentAccumulator::update`] and carried in
/// [`AcceptOutcome::Accepted`] for observability. A segment's first sample
/// establishes its origin and yields a zero delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDelta {
    /// Distance travelled since the previous sample, in meters
    pub distance_meters: f64,
    /// Time elapsed since the previous sample
    pub moving_time: Duration,
}

impl SampleDelta {
    /// A delta that moves nothing - the first sample of a segment.
    pub fn zero() -> Self {
        Self {
            distance_meters: 0.0,
            moving_time: Duration::zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.distance_meters == 0.0 && self.moving_time.is_zero()
    }
}
