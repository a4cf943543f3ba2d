//! Track persistence boundary.
//!
//! The session reports accepted points and segment events through
//! [`TrackSink`]; what happens to them (GPX file, database, nothing) is the
//! sink's business. The engine guarantees at most one `on_point` per
//! accepted sample, exactly one `on_segment_boundary` per successful lap
//! (delivered before any point of the new lap), and one `on_close` per stop.
//!
//! Sinks are synchronous from the session's perspective. A sink that
//! persists asynchronously must buffer internally; the engine never blocks
//! on I/O and never retries it.

use crate::error::Result;
use crate::Sample;

/// Receiver for recording output events.
pub trait TrackSink {
    /// An accepted sample, in acceptance order.
    fn on_point(&mut self, sample: &Sample) -> Result<()>;

    /// A lap boundary: the current segment ends, the next begins.
    fn on_segment_boundary(&mut self) -> Result<()>;

    /// The recording stopped; flush and finalize the output.
    fn on_close(&mut self) -> Result<()>;
}

/// Discards everything. Useful when only the live metrics matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TrackSink for NullSink {
    fn on_point(&mut self, _sample: &Sample) -> Result<()> {
        Ok(())
    }

    fn on_segment_boundary(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps the recorded track in memory, one `Vec<Sample>` per segment.
///
/// Mostly for tests and embedding; the segment layout mirrors what a file
/// sink would write, so replaying the stored samples through a fresh
/// session reproduces the same accumulator totals.
#[derive(Debug, Clone)]
pub struct MemorySink {
    segments: Vec<Vec<Sample>>,
    closed: bool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            segments: vec![Vec::new()],
            closed: false,
        }
    }

    /// Recorded segments in order; the trailing segment may be empty if a
    /// lap boundary was the last event.
    pub fn segments(&self) -> &[Vec<Sample>] {
        &self.segments
    }

    /// All recorded samples across segments, in acceptance order.
    pub fn points(&self) -> impl Iterator<Item = &Sample> {
        self.segments.iter().flatten()
    }

    /// Whether `on_close` has been delivered.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl TrackSink for MemorySink {
    fn on_point(&mut self, sample: &Sample) -> Result<()> {
        // segments is never empty after construction
        if let Some(segment) = self.segments.last_mut() {
            segment.push(*sample);
        }
        Ok(())
    }

    fn on_segment_boundary(&mut self) -> Result<()> {
        self.segments.push(Vec::new());
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
