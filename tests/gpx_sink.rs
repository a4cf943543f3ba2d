//! Tests for the GPX sink

#![cfg(feature = "gpx")]

use chrono::{DateTime, Duration, TimeZone, Utc};
use trackrec::{GpsPoint, GpxSink, RecordingSession, Sample};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn record_two_laps(buf: &mut Vec<u8>) {
    let sink = GpxSink::new(buf).with_name("morning ride");
    let mut session = RecordingSession::new(sink);
    session.start(t0()).unwrap();

    for i in 0..3 {
        session.accept(Sample::new(
            GpsPoint::with_elevation(47.37 + i as f64 * 0.001, 8.55, 300.0),
            t0() + Duration::seconds(i),
        ));
    }
    session.lap(t0() + Duration::seconds(3)).unwrap();
    for i in 3..5 {
        session.accept(Sample::new(
            GpsPoint::new(47.37 + i as f64 * 0.001, 8.55),
            t0() + Duration::seconds(i),
        ));
    }

    session.stop().unwrap();
}

#[test]
fn test_written_document_preserves_laps_and_points() {
    let mut buf = Vec::new();
    record_two_laps(&mut buf);

    let gpx = gpx::read(&buf[..]).expect("written document parses");
    assert_eq!(gpx.tracks.len(), 1);

    let track = &gpx.tracks[0];
    assert_eq!(track.name.as_deref(), Some("morning ride"));
    assert_eq!(track.segments.len(), 2);
    assert_eq!(track.segments[0].points.len(), 3);
    assert_eq!(track.segments[1].points.len(), 2);

    // Points carry position, elevation and timestamp
    let first = &track.segments[0].points[0];
    assert!((first.point().y() - 47.37).abs() < 1e-9);
    assert!((first.point().x() - 8.55).abs() < 1e-9);
    assert_eq!(first.elevation, Some(300.0));
    assert!(first.time.is_some());
}

#[test]
fn test_empty_lap_is_written_as_empty_segment() {
    let mut buf = Vec::new();
    {
        let sink = GpxSink::new(&mut buf);
        let mut session = RecordingSession::new(sink);
        session.start(t0()).unwrap();
        session.accept(Sample::new(GpsPoint::new(47.37, 8.55), t0()));
        // Boundary with no samples after it before stop
        session.lap(t0() + Duration::seconds(1)).unwrap();
        session.stop().unwrap();
    }

    // The lap partition is preserved: one <trkseg> per lap, the second empty
    let gpx = gpx::read(&buf[..]).expect("written document parses");
    assert_eq!(gpx.tracks[0].segments.len(), 2);
    assert_eq!(gpx.tracks[0].segments[0].points.len(), 1);
    assert!(gpx.tracks[0].segments[1].points.is_empty());
}
