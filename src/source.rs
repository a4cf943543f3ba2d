//! Sample producers.
//!
//! The engine never generates positions itself - it pulls them from a
//! [`SampleSource`], or the integrating glue pushes them straight into
//! [`RecordingSession::accept`](crate::RecordingSession::accept). Timestamps
//! should be non-decreasing in delivery order; the session tolerates
//! violations by rejecting the offending sample, so a source does not have
//! to be perfect, just honest.

use crate::Sample;

/// Pull-style producer of positioning samples.
pub trait SampleSource {
    /// The next sample, or `None` when the source is exhausted (or, for a
    /// live source, when no fix is currently available).
    fn next_sample(&mut self) -> Option<Sample>;
}

/// Replays a prepared list of samples in order.
///
/// Used by the CLI to feed recorded GPX tracks back through the engine, and
/// by tests that want a scripted stream.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    samples: std::vec::IntoIter<Sample>,
}

impl ReplaySource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }

    /// Samples remaining to be replayed.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl SampleSource for ReplaySource {
    fn next_sample(&mut self) -> Option<Sample> {
        self.samples.next()
    }
}

impl Iterator for ReplaySource {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.next_sample()
    }
}
