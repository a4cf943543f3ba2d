//! GPX file output.
//!
//! [`GpxSink`] renders the recorded track as a GPX 1.1 document: one
//! `<trk>`, one `<trkseg>` per lap (empty laps included), one `<trkpt>` per
//! accepted sample with elevation and timestamp. That is enough to
//! reconstruct the lap partition and the same accumulator totals on replay
//! (see the CLI's `replay` subcommand).
//!
//! The document is buffered in memory and serialized once on `on_close`;
//! an activity recording at 1 Hz stays far below anything worth streaming.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem;
use std::path::Path;

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use log::warn;
use time::OffsetDateTime;

use crate::error::Result;
use crate::sink::TrackSink;
use crate::Sample;

/// [`TrackSink`] that writes a GPX 1.1 document on close.
pub struct GpxSink<W: Write> {
    writer: Option<W>,
    segments: Vec<TrackSegment>,
    current: TrackSegment,
    name: Option<String>,
}

impl GpxSink<BufWriter<File>> {
    /// Create a sink writing to a new file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> GpxSink<W> {
    /// Create a sink writing the finished document to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            segments: Vec::new(),
            current: TrackSegment::default(),
            name: None,
        }
    }

    /// Set the track name recorded in the document.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn finish_segment(&mut self) {
        // One <trkseg> per lap, even when the lap accepted no samples, so
        // the lap partition survives a replay of the file.
        self.segments.push(mem::take(&mut self.current));
    }
}

impl<W: Write> TrackSink for GpxSink<W> {
    fn on_point(&mut self, sample: &Sample) -> Result<()> {
        let mut wpt = Waypoint::new(Point::new(
            sample.point.longitude,
            sample.point.latitude,
        ));
        wpt.elevation = sample.point.elevation;
        wpt.hdop = sample.point.accuracy;

        match OffsetDateTime::from_unix_timestamp(sample.time.timestamp()) {
            Ok(odt) => wpt.time = Some(odt.into()),
            Err(e) => warn!("dropping unrepresentable point timestamp: {e}"),
        }

        self.current.points.push(wpt);
        Ok(())
    }

    fn on_segment_boundary(&mut self) -> Result<()> {
        self.finish_segment();
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        self.finish_segment();

        let Some(writer) = self.writer.take() else {
            // Already closed; the session guarantees one on_close per stop,
            // so this only happens when a sink is reused by hand.
            return Ok(());
        };

        let mut track = Track::default();
        track.name = self.name.clone();
        track.segments = mem::take(&mut self.segments);

        let mut metadata = Metadata::default();
        metadata.name = self.name.clone();

        let gpx = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some(format!("trackrec {}", env!("CARGO_PKG_VERSION"))),
            metadata: Some(metadata),
            tracks: vec![track],
            ..Default::default()
        };

        gpx::write(&gpx, writer)?;
        Ok(())
    }
}
