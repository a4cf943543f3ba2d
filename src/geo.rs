//! Geographic and temporal primitives.
//!
//! Pure functions only - no state, no I/O. Distance uses the haversine
//! formula on a spherical earth, which is accurate to ~0.5% and symmetric,
//! more than enough for consumer GPS variance of 5-10m.
//!
//! Callers are responsible for validating coordinates with
//! [`GpsPoint::is_valid`](crate::GpsPoint::is_valid) first; out-of-range
//! input produces degenerate (NaN) results rather than panics.

use crate::{GpsPoint, Sample, SampleDelta};
use chrono::{DateTime, Duration, Utc};

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine).
///
/// Symmetric, and exactly zero when both points share the same
/// latitude/longitude.
///
/// # Example
/// ```
/// use trackrec::GpsPoint;
/// use trackrec::geo::haversine_distance;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let d = haversine_distance(&london, &paris);
/// assert!((d - 343_560.0).abs() < 5_000.0); // ~344 km
/// ```
pub fn haversine_distance(a: &GpsPoint, b: &GpsPoint) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Initial bearing from `a` to `b` in compass degrees (0 = north, 90 = east).
pub fn initial_bearing(a: &GpsPoint, b: &GpsPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Signed duration `t2 - t1`.
///
/// Negative when `t2` precedes `t1`; accumulating callers must treat a
/// negative result as a data error (clock skew or out-of-order delivery),
/// never as real elapsed time.
pub fn elapsed(t1: DateTime<Utc>, t2: DateTime<Utc>) -> Duration {
    t2 - t1
}

/// Distance and elapsed time from one sample to the next.
pub fn sample_delta(prev: &Sample, next: &Sample) -> SampleDelta {
    SampleDelta {
        distance_meters: haversine_distance(&prev.point, &next.point),
        moving_time: elapsed(prev.time, next.time),
    }
}
