use chrono::Datelike;
use qibla_compass::api::{CompassSession, FeedbackEvent, StatusFormatter};
use qibla_compass::hardware::{FixedLocation, MockSensorStream};
use qibla_compass::{qibla_bearing, EngineConfig, GeoPoint, RawSensorSample};
use tracing_subscriber::EnvFilter;

/// Headings swept by the demo, relative to the magnetic heading that lines
/// up with the target
const SWEEP_OFFSETS_DEG: [f64; 9] = [-60.0, -30.0, -15.0, -8.0, -3.0, 0.0, 2.0, 20.0, 0.0];

const SWEEP_STEP_MS: u64 = 1500;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DemoArgs {
    origin: GeoPoint,
    year: i32,
}

fn parse_args(args: &[String]) -> Result<DemoArgs, Box<dyn std::error::Error>> {
    if args.len() != 3 && args.len() != 4 {
        return Err("expected <lat> <lon> [year]".into());
    }

    let latitude = args[1].parse::<f64>()?;
    let longitude = args[2].parse::<f64>()?;
    let origin = GeoPoint::new(latitude, longitude)?;
    let year = match args.get(3) {
        Some(year) => year.parse::<i32>()?,
        None => chrono::Local::now().year(),
    };

    Ok(DemoArgs { origin, year })
}

fn run_sweep(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::default();
    let declination_deg = config.declination.declination(&args.origin, args.year);
    let bearing = qibla_bearing(args.origin);

    println!("Location: {}", args.origin);
    println!("Qibla bearing: {} (true north)", bearing);
    println!("Declination estimate for {}: {:+.2}°", args.year, declination_deg);
    println!();

    let mut location = FixedLocation(args.origin);
    let mut session = CompassSession::start(config, Box::new(MockSensorStream::new()), &mut location)?
        .with_year(args.year);
    session.register_feedback_callback(Box::new(|event: &FeedbackEvent| {
        println!("  >> aligned at t={} ms (offset {:+.1}°)", event.timestamp_ms, event.alignment.offset_deg);
    }));

    // Magnetic reading that puts the corrected heading on the target
    let aligned_magnetic = bearing.degrees() - declination_deg;
    let formatter = StatusFormatter::new();

    for (i, offset) in SWEEP_OFFSETS_DEG.iter().enumerate() {
        let timestamp_ms = SWEEP_STEP_MS * i as u64;
        let heading = aligned_magnetic + offset;
        let radians = heading.to_radians();
        let sample = RawSensorSample::magnetic(radians.cos(), radians.sin(), 0.0, timestamp_ms);
        session.ingest(&sample);

        let report = formatter.report(&session.snapshot());
        println!("t={:>5} ms  {}", timestamp_ms, report.headline);
    }

    // Tip the device to show the flatness warning
    let tilted = RawSensorSample::tilt(0.4, 0.0, 0.0, SWEEP_STEP_MS * SWEEP_OFFSETS_DEG.len() as u64);
    session.ingest(&tilted);
    println!();
    println!("{}", formatter.format_text(&formatter.report(&session.snapshot())));

    let stats = session.stop();
    println!();
    println!(
        "Samples: {} ingested, {} rejected; feedback fired {} time(s)",
        stats.samples_ingested, stats.samples_rejected, stats.feedback_fired
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let demo_args = match parse_args(&args) {
        Ok(demo_args) => demo_args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: {} <lat> <lon> [year]",
                args.first().map_or("qibla-compass", |s| s.as_str())
            );
            return Err(e);
        }
    };

    run_sweep(demo_args)
}
