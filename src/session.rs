//! Recording lifecycle state machine.
//!
//! A [`RecordingSession`] owns one all-activity accumulator plus an
//! append-only list of lap accumulators, and routes every incoming sample to
//! the pair that is currently active. Lifecycle commands (`start`, `lap`,
//! `pause`, `resume`, `stop`) are guarded by an explicit state enum; a
//! command issued in the wrong state fails with
//! [`RecordingError::InvalidTransition`] and changes nothing.
//!
//! The session is strictly sequential: every command goes through
//! `&mut self`, so a sample can never interleave with a lap or pause
//! mid-update. Callers bridging an async sample producer must funnel both
//! samples and operator commands through a single owner (a channel task or a
//! mutex) - the engine itself is runtime-agnostic.

use crate::accumulator::{SegmentAccumulator, SegmentSummary};
use crate::error::{RecordingError, Result};
use crate::sink::TrackSink;
use crate::{Sample, SampleDelta};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a recording session.
///
/// `Idle → Recording ⇄ Paused → Stopped`; `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Constructed, not yet started
    Idle,
    /// Actively accepting samples
    Recording,
    /// Temporarily suspended; samples are ignored, totals frozen
    Paused,
    /// Finished; no further commands are accepted
    Stopped,
}

/// Why a sample was rejected without updating any accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Latitude/longitude out of range or non-finite
    InvalidCoordinates,
    /// The sample's timestamp precedes the last accepted one; counting it
    /// would corrupt the cumulative moving time
    TimeReversal,
}

/// Per-sample result of [`RecordingSession::accept`].
///
/// Only `Accepted` mutates state. The other variants exist for
/// observability - sampling legitimately races with pause, and a flaky
/// receiver must not be able to abort a recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptOutcome {
    /// Sample applied to the all-activity and active-lap accumulators and
    /// forwarded to the sink. The delta is relative to the active segment's
    /// previous sample; a segment's first sample yields zero.
    Accepted { delta: SampleDelta },
    /// Session was not `Recording`; the sample was dropped without effect.
    Ignored { state: SessionState },
    /// Sample failed validation; neither accumulator was updated and the
    /// sink was not notified.
    Rejected { reason: RejectReason },
}

/// The recording state machine.
///
/// Created once per activity, driven by one logical command stream, and
/// discarded after [`stop`](Self::stop). Accumulators are owned exclusively
/// by the session; external code only sees read-only summaries.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use trackrec::{GpsPoint, MemorySink, RecordingSession, Sample, SessionState};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
/// let mut session = RecordingSession::new(MemorySink::new());
///
/// session.start(t0).unwrap();
/// session.accept(Sample::new(GpsPoint::new(47.37, 8.55), t0));
/// session.lap(t0 + Duration::seconds(30)).unwrap();
/// session.stop().unwrap();
/// assert_eq!(session.state(), SessionState::Stopped);
/// ```
pub struct RecordingSession<S: TrackSink> {
    state: SessionState,
    sink: S,
    all: Option<SegmentAccumulator>,
    laps: Vec<SegmentAccumulator>,
    started_at: Option<DateTime<Utc>>,
    ignored_samples: u32,
    rejected_samples: u32,
}

impl<S: TrackSink> RecordingSession<S> {
    /// Create an idle session that will report to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            state: SessionState::Idle,
            sink,
            all: None,
            laps: Vec::new(),
            started_at: None,
            ignored_samples: 0,
            rejected_samples: 0,
        }
    }

    /// Begin recording at `now`.
    ///
    /// Creates the all-activity accumulator and the first lap, both empty.
    /// Valid only from `Idle`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(RecordingError::invalid_transition("start", self.state));
        }

        self.all = Some(SegmentAccumulator::new(now));
        self.laps.push(SegmentAccumulator::new(now));
        self.started_at = Some(now);
        self.state = SessionState::Recording;
        debug!("recording started at {now}");
        Ok(())
    }

    /// Feed one sample into the session.
    ///
    /// While `Recording`, a valid sample advances both the all-activity and
    /// the active-lap accumulator and is forwarded to the sink. In any other
    /// state the sample is dropped and reported as `Ignored` - this is a
    /// normal occurrence when the sample stream races a pause, not an error.
    ///
    /// A sink failure while persisting the point is logged and does not
    /// affect the accumulated metrics.
    pub fn accept(&mut self, sample: Sample) -> AcceptOutcome {
        if self.state != SessionState::Recording {
            self.ignored_samples += 1;
            debug!("ignoring sample while {:?}", self.state);
            return AcceptOutcome::Ignored { state: self.state };
        }

        if !sample.point.is_valid() {
            self.rejected_samples += 1;
            warn!(
                "rejecting sample with out-of-range coordinates ({}, {})",
                sample.point.latitude, sample.point.longitude
            );
            return AcceptOutcome::Rejected {
                reason: RejectReason::InvalidCoordinates,
            };
        }

        // start() creates both accumulators before entering Recording.
        let (Some(all), Some(lap)) = (self.all.as_mut(), self.laps.last_mut()) else {
            return AcceptOutcome::Ignored { state: self.state };
        };

        // Reversal is judged against the session's most recent accepted
        // sample. Right after lap() the new lap has no origin but the
        // activity still does; only start() and resume() leave both unset,
        // and then any timestamp may open the segment.
        if let Some(prev) = lap.last_sample().or_else(|| all.last_sample()) {
            if sample.time < prev.time {
                self.rejected_samples += 1;
                warn!(
                    "rejecting sample: timestamp {} precedes previous sample at {}",
                    sample.time, prev.time
                );
                return AcceptOutcome::Rejected {
                    reason: RejectReason::TimeReversal,
                };
            }
        }

        // One delta, computed against the active lap's origin, applied to
        // both accumulators: the activity total stays the exact sum of the
        // lap totals, and the hop across a lap boundary counts in neither.
        let delta = lap.update(&sample);
        all.apply_delta(&sample, delta);

        if let Err(e) = self.sink.on_point(&sample) {
            warn!("track sink failed to persist point: {e}");
        }

        AcceptOutcome::Accepted { delta }
    }

    /// Close the current lap and open a new one starting at `now`.
    ///
    /// The closed lap's totals are frozen from this point on. The sink is
    /// notified of the segment boundary before any point of the new lap;
    /// a sink failure is logged, the lap still opens.
    ///
    /// Valid only while `Recording`.
    pub fn lap(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state != SessionState::Recording {
            return Err(RecordingError::invalid_transition("lap", self.state));
        }

        if let Err(e) = self.sink.on_segment_boundary() {
            warn!("track sink failed to record lap boundary: {e}");
        }
        self.laps.push(SegmentAccumulator::new(now));
        debug!("lap {} opened at {now}", self.laps.len());
        Ok(())
    }

    /// Suspend recording. Accumulator state is untouched; subsequent samples
    /// are ignored until [`resume`](Self::resume), which is how paused
    /// wall-clock time stays out of the moving-time totals.
    ///
    /// Valid only while `Recording`.
    pub fn pause(&mut self) -> Result<()> {
        if self.state != SessionState::Recording {
            return Err(RecordingError::invalid_transition("pause", self.state));
        }
        self.state = SessionState::Paused;
        debug!("recording paused");
        Ok(())
    }

    /// Resume a paused recording.
    ///
    /// Clears the last-accepted sample of both the all-activity and the
    /// active-lap accumulator, so the next sample becomes a fresh segment
    /// origin. Without this, the gap between the last pre-pause fix and the
    /// first post-pause fix would be counted as real movement even though
    /// the object went unmonitored.
    ///
    /// Valid only while `Paused`.
    pub fn resume(&mut self) -> Result<()> {
        if self.state != SessionState::Paused {
            return Err(RecordingError::invalid_transition("resume", self.state));
        }

        if let Some(all) = self.all.as_mut() {
            all.reset_origin();
        }
        if let Some(lap) = self.laps.last_mut() {
            lap.reset_origin();
        }
        self.state = SessionState::Recording;
        debug!("recording resumed");
        Ok(())
    }

    /// Finish the recording and close the sink.
    ///
    /// Valid from `Recording` or `Paused`, exactly once. The session is
    /// `Stopped` even if closing the sink fails; the sink error is surfaced
    /// because it may mean the recorded track was not fully persisted.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            SessionState::Recording | SessionState::Paused => {
                self.state = SessionState::Stopped;
                debug!(
                    "recording stopped: {} laps, {} ignored, {} rejected",
                    self.laps.len(),
                    self.ignored_samples,
                    self.rejected_samples
                );
                self.sink.on_close()
            }
            state => Err(RecordingError::invalid_transition("stop", state)),
        }
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// When [`start`](Self::start) was called, once it has been.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Whole-activity totals. `None` before `start`.
    pub fn totals(&self) -> Option<SegmentSummary> {
        self.all.as_ref().map(SegmentAccumulator::summary)
    }

    /// Totals per lap, in recording order. The last entry is the active
    /// (or final) lap.
    pub fn lap_summaries(&self) -> Vec<SegmentSummary> {
        self.laps.iter().map(SegmentAccumulator::summary).collect()
    }

    /// Number of laps opened so far.
    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    /// Samples dropped because the session was not `Recording`.
    pub fn ignored_samples(&self) -> u32 {
        self.ignored_samples
    }

    /// Samples rejected by validation.
    pub fn rejected_samples(&self) -> u32 {
        self.rejected_samples
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the session and return the sink, e.g. to inspect a
    /// [`MemorySink`](crate::MemorySink) after recording.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
