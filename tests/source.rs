//! Tests for sample sources

use chrono::{DateTime, Duration, TimeZone, Utc};
use trackrec::{GpsPoint, MemorySink, RecordingSession, ReplaySource, Sample, SampleSource};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn scripted_samples(count: u32) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            Sample::new(
                GpsPoint::new(47.37 + i as f64 * 0.001, 8.55),
                t0() + Duration::seconds(i as i64),
            )
        })
        .collect()
}

#[test]
fn test_replay_source_yields_in_order() {
    let samples = scripted_samples(5);
    let mut source = ReplaySource::new(samples.clone());

    assert_eq!(source.remaining(), 5);
    for expected in &samples {
        assert_eq!(source.next_sample().as_ref(), Some(expected));
    }
    assert!(source.next_sample().is_none());
    assert_eq!(source.remaining(), 0);
}

#[test]
fn test_session_drains_a_source() {
    let mut source = ReplaySource::new(scripted_samples(10));
    let mut session = RecordingSession::new(MemorySink::new());
    session.start(t0()).unwrap();

    while let Some(sample) = source.next_sample() {
        session.accept(sample);
    }
    session.stop().unwrap();

    let totals = session.totals().unwrap();
    assert_eq!(totals.sample_count, 10);
    // Nine ~111m hops
    assert!((totals.distance_meters - 9.0 * 111.3).abs() < 9.0);
    assert_eq!(totals.moving_time_seconds, 9.0);
}
