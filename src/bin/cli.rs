//! trackrec CLI - record and replay GPS activities
//!
//! Usage:
//!   trackrec-cli replay <file.gpx> [--output <file.gpx>]
//!   trackrec-cli synth [--output <file.gpx>] [--duration <secs>] [--laps <n>]
//!
//! `replay` feeds a recorded GPX file back through the recording engine,
//! treating each <trkseg> boundary as a lap, and prints the per-lap and
//! total metrics the engine derives. `synth` generates a deterministic
//! synthetic ride, records it, and writes the result as GPX.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gpx::read;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use time::OffsetDateTime;
use trackrec::synthetic::SyntheticRide;
use trackrec::{
    AcceptOutcome, GpsPoint, GpxSink, NullSink, RecordingSession, Sample, SegmentSummary,
    TrackSink,
};

#[derive(Parser)]
#[command(name = "trackrec-cli")]
#[command(about = "Record and replay GPS activities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a GPX file through the recording engine
    Replay {
        /// GPX file to replay
        file: PathBuf,

        /// Re-record the replayed track to a new GPX file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate and record a synthetic ride
    Synth {
        /// Output GPX file
        #[arg(short, long, default_value = "synthetic.gpx")]
        output: PathBuf,

        /// Ride duration in seconds
        #[arg(long, default_value = "1800")]
        duration: u32,

        /// Cruising speed in m/s
        #[arg(long, default_value = "8.0")]
        speed: f64,

        /// Number of laps to split the ride into
        #[arg(long, default_value = "1")]
        laps: u32,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay { file, output } => run_replay(&file, output.as_deref(), cli.verbose),
        Commands::Synth {
            output,
            duration,
            speed,
            laps,
            seed,
        } => run_synth(&output, duration, speed, laps, seed),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// One lap of samples extracted from a GPX <trkseg>.
struct GpxLap {
    samples: Vec<Sample>,
}

fn run_replay(
    file: &PathBuf,
    output: Option<&std::path::Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "=".repeat(60));
    println!("Replaying: {}", file.display());
    println!("{}", "=".repeat(60));

    let laps = load_gpx_laps(file)?;
    let total_points: usize = laps.iter().map(|l| l.samples.len()).sum();
    println!(
        "  {} segment(s), {} timestamped points",
        laps.len(),
        total_points
    );

    let start_time = laps
        .iter()
        .flat_map(|l| l.samples.first())
        .map(|s| s.time)
        .next()
        .ok_or("no timestamped track points in file")?;

    match output {
        Some(path) => {
            let sink = GpxSink::create(path)?.with_name(
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "replayed".to_string()),
            );
            let summaries = drive_session(sink, &laps, start_time, verbose)?;
            println!("  Re-recorded to {}", path.display());
            print_report(&summaries);
        }
        None => {
            let summaries = drive_session(NullSink, &laps, start_time, verbose)?;
            print_report(&summaries);
        }
    }

    Ok(())
}

fn run_synth(
    output: &PathBuf,
    duration: u32,
    speed: f64,
    laps: u32,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "=".repeat(60));
    println!("Generating synthetic ride: {duration}s at {speed} m/s, {laps} lap(s), seed {seed}");
    println!("{}", "=".repeat(60));

    let ride = SyntheticRide {
        origin: GpsPoint::new(47.37, 8.55),
        start_time: Utc::now(),
        duration_seconds: duration,
        sample_interval_seconds: 1,
        speed_mps: speed,
        gps_noise_sigma_meters: 3.0,
        seed,
    };
    let samples = ride.generate();

    // Split evenly into the requested lap count.
    let laps = laps.max(1) as usize;
    let chunk = samples.len().div_ceil(laps);
    let gpx_laps: Vec<GpxLap> = samples
        .chunks(chunk)
        .map(|c| GpxLap {
            samples: c.to_vec(),
        })
        .collect();

    let sink = GpxSink::create(output)?.with_name("synthetic ride");
    let summaries = drive_session(sink, &gpx_laps, ride.start_time, false)?;
    println!("  Written to {}", output.display());
    print_report(&summaries);

    Ok(())
}

/// Feed the laps through a fresh recording session and collect summaries.
fn drive_session<S: TrackSink>(
    sink: S,
    laps: &[GpxLap],
    start_time: DateTime<Utc>,
    verbose: bool,
) -> Result<(SegmentSummary, Vec<SegmentSummary>), Box<dyn std::error::Error>> {
    let mut session = RecordingSession::new(sink);
    session.start(start_time)?;

    for (i, lap) in laps.iter().enumerate() {
        if i > 0 {
            let lap_start = lap.samples.first().map(|s| s.time).unwrap_or(start_time);
            session.lap(lap_start)?;
        }
        for sample in &lap.samples {
            match session.accept(*sample) {
                AcceptOutcome::Accepted { delta } if verbose => {
                    println!(
                        "    +{:.1}m +{}s",
                        delta.distance_meters,
                        delta.moving_time.num_seconds()
                    );
                }
                AcceptOutcome::Rejected { reason } => {
                    eprintln!("    rejected sample at {}: {:?}", sample.time, reason);
                }
                _ => {}
            }
        }
    }

    session.stop()?;

    let totals = session.totals().ok_or("session produced no totals")?;
    Ok((totals, session.lap_summaries()))
}

fn print_report((totals, laps): &(SegmentSummary, Vec<SegmentSummary>)) {
    println!(
        "\n  {:<6} {:>10} {:>10} {:>9} {:>8}",
        "lap", "dist (km)", "time (s)", "avg km/h", "points"
    );
    for (i, lap) in laps.iter().enumerate() {
        println!(
            "  {:<6} {:>10.2} {:>10.0} {:>9} {:>8}",
            i + 1,
            lap.distance_meters / 1000.0,
            lap.moving_time_seconds,
            lap.average_speed
                .map(|v| format!("{:.1}", v * 3.6))
                .unwrap_or_else(|| "-".to_string()),
            lap.sample_count,
        );
    }
    println!(
        "  {:<6} {:>10.2} {:>10.0} {:>9} {:>8}",
        "total",
        totals.distance_meters / 1000.0,
        totals.moving_time_seconds,
        totals
            .average_speed
            .map(|v| format!("{:.1}", v * 3.6))
            .unwrap_or_else(|| "-".to_string()),
        totals.sample_count,
    );
}

/// Load a GPX file as one lap per <trkseg>, keeping only timestamped points.
fn load_gpx_laps(path: &PathBuf) -> Result<Vec<GpxLap>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let gpx = read(BufReader::new(file))?;

    let mut laps = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            let mut samples = Vec::with_capacity(segment.points.len());
            for wpt in &segment.points {
                let Some(time) = wpt.time else { continue };
                let odt: OffsetDateTime = time.into();
                let Some(ts) = DateTime::<Utc>::from_timestamp(odt.unix_timestamp(), 0) else {
                    continue;
                };

                let mut point = GpsPoint::new(wpt.point().y(), wpt.point().x());
                point.elevation = wpt.elevation;
                point.accuracy = wpt.hdop;
                samples.push(Sample::new(point, ts));
            }
            if !samples.is_empty() {
                laps.push(GpxLap { samples });
            }
        }
    }

    Ok(laps)
}
