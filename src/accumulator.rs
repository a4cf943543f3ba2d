//! Per-segment metric aggregation.
//!
//! A [`SegmentAccumulator`] owns the running totals for one contiguous
//! stretch of recording - either the whole activity or a single lap. It
//! consumes validated samples one at a time and only ever grows: totals are
//! mutated exclusively by [`update`](SegmentAccumulator::update) and reset
//! only by constructing a fresh accumulator for a new segment.

use crate::{geo, Sample, SampleDelta};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Running totals for one contiguous recording segment.
#[derive(Debug, Clone)]
pub struct SegmentAccumulator {
    distance_meters: f64,
    moving_time: Duration,
    sample_count: u32,
    last_sample: Option<Sample>,
    started_at: DateTime<Utc>,
}

impl SegmentAccumulator {
    /// Create an empty accumulator for a segment beginning at `started_at`.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            distance_meters: 0.0,
            moving_time: Duration::zero(),
            sample_count: 0,
            last_sample: None,
            started_at,
        }
    }

    /// Fold one sample into the totals and return the applied delta.
    ///
    /// The first sample after construction (or after
    /// [`reset_origin`](Self::reset_origin)) establishes the segment origin
    /// and contributes a zero delta. Every later sample adds the haversine
    /// distance and elapsed time relative to the previous one.
    ///
    /// The caller (the session) is responsible for validation: coordinates
    /// must be in range and `sample.time` must not precede the previous
    /// sample's time. A negative time step is clamped to zero so the totals
    /// stay monotone regardless.
    pub fn update(&mut self, sample: &Sample) -> SampleDelta {
        let delta = match &self.last_sample {
            None => SampleDelta::zero(),
            Some(prev) => {
                let mut delta = geo::sample_delta(prev, sample);
                if delta.moving_time < Duration::zero() {
                    delta.moving_time = Duration::zero();
                }
                delta
            }
        };

        self.distance_meters += delta.distance_meters;
        self.moving_time += delta.moving_time;
        self.sample_count += 1;
        self.last_sample = Some(*sample);

        delta
    }

    /// Fold an externally computed delta into the totals.
    ///
    /// Used for the all-activity accumulator: the session computes one delta
    /// against the active lap's origin and applies the same increment to
    /// both accumulators, so the activity total is always the sum of the lap
    /// totals and a lap boundary's cross-over hop counts in neither.
    pub fn apply_delta(&mut self, sample: &Sample, delta: SampleDelta) {
        self.distance_meters += delta.distance_meters.max(0.0);
        if delta.moving_time > Duration::zero() {
            self.moving_time += delta.moving_time;
        }
        self.sample_count += 1;
        self.last_sample = Some(*sample);
    }

    /// Forget the last-accepted sample without touching the totals.
    ///
    /// Used when resuming from pause: the next sample becomes a fresh
    /// segment origin, so the unmonitored gap is never counted as movement
    /// or elapsed time.
    pub fn reset_origin(&mut self) {
        self.last_sample = None;
    }

    /// Cumulative distance in meters. Non-negative, non-decreasing.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Cumulative time spent actively recording. Non-negative,
    /// non-decreasing; paused wall-clock time is excluded.
    pub fn moving_time(&self) -> Duration {
        self.moving_time
    }

    /// Number of samples folded into this segment.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// The most recently accepted sample, if any since the last origin reset.
    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    /// When this segment was opened.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Average speed in meters per second.
    ///
    /// `None` while moving time is zero - the quantity is undefined, not
    /// infinite.
    pub fn average_speed(&self) -> Option<f64> {
        let secs = duration_seconds(self.moving_time);
        if secs > 0.0 {
            Some(self.distance_meters / secs)
        } else {
            None
        }
    }

    /// Snapshot of the totals for reporting and serialization.
    pub fn summary(&self) -> SegmentSummary {
        SegmentSummary {
            distance_meters: self.distance_meters,
            moving_time_seconds: duration_seconds(self.moving_time),
            sample_count: self.sample_count,
            average_speed: self.average_speed(),
            started_at: self.started_at,
        }
    }
}

/// Serializable snapshot of a segment's totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Distance in meters
    pub distance_meters: f64,
    /// Active recording time in seconds
    pub moving_time_seconds: f64,
    /// Number of accepted samples
    pub sample_count: u32,
    /// Average speed in m/s; `None` when no time has accumulated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// When the segment was opened
    pub started_at: DateTime<Utc>,
}

fn duration_seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GpsPoint;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn first_sample_is_zero_delta() {
        let mut acc = SegmentAccumulator::new(t0());
        let delta = acc.update(&Sample::new(GpsPoint::new(51.5, -0.12), t0()));
        assert!(delta.is_zero());
        assert_eq!(acc.sample_count(), 1);
        assert_eq!(acc.distance_meters(), 0.0);
    }

    #[test]
    fn reset_origin_keeps_totals() {
        let mut acc = SegmentAccumulator::new(t0());
        acc.update(&Sample::new(GpsPoint::new(51.5, -0.12), t0()));
        acc.update(&Sample::new(
            GpsPoint::new(51.501, -0.12),
            t0() + Duration::seconds(10),
        ));
        let distance = acc.distance_meters();
        assert!(distance > 0.0);

        acc.reset_origin();
        assert_eq!(acc.distance_meters(), distance);
        assert!(acc.last_sample().is_none());

        // Next sample re-establishes the origin without adding movement.
        let delta = acc.update(&Sample::new(
            GpsPoint::new(51.6, -0.12),
            t0() + Duration::seconds(600),
        ));
        assert!(delta.is_zero());
        assert_eq!(acc.distance_meters(), distance);
    }

    #[test]
    fn average_speed_undefined_without_time() {
        let mut acc = SegmentAccumulator::new(t0());
        assert!(acc.average_speed().is_none());
        acc.update(&Sample::new(GpsPoint::new(51.5, -0.12), t0()));
        assert!(acc.average_speed().is_none());
    }
}
