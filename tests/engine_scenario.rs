use qibla_compass::algorithms::alignment::{classify, AccuracyTier};
use qibla_compass::algorithms::bearing::initial_bearing;
use qibla_compass::api::{BearingStatus, CompassSession, FeedbackEvent, StatusFormatter, UnavailableReason};
use qibla_compass::core::{normalize_degrees, wrap_signed_degrees, Bearing, GeoPoint};
use qibla_compass::hardware::{MockLocationProvider, MockSensorStream};
use qibla_compass::processing::{CooldownBoundary, FeedbackConfig};
use qibla_compass::{EngineConfig, SensorKind};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_offset_matches_bearing_formula() {
    let origin = GeoPoint::new(21.0, 39.0).unwrap();
    let target = initial_bearing(origin, GeoPoint::kaaba());

    let result = classify(target, Bearing::new(0.0), 0.0);

    let expected = wrap_signed_degrees(normalize_degrees(target.degrees() - 0.0));
    assert!((result.offset_deg - expected).abs() < 1e-9);
    assert!(result.offset_deg > -180.0 && result.offset_deg <= 180.0);

    let tier = match expected.abs() {
        m if m <= 5.0 => AccuracyTier::Accurate,
        m if m <= 15.0 => AccuracyTier::Close,
        _ => AccuracyTier::Far,
    };
    assert_eq!(result.tier, tier);
}

#[test]
fn test_session_end_to_end() {
    let origin = GeoPoint::new(-6.2088, 106.8456).unwrap();
    let mut stream = MockSensorStream::new();
    let probe = stream.probe();

    let config = EngineConfig::default();
    let declination = config.declination.declination(&origin, 2020);
    let target = initial_bearing(origin, config.target).degrees();
    let aligned = target - declination;

    // Sweep in from 39 degrees off, hold on target, then wander off
    let mut headings: Vec<f64> = (0..8).map(|i| aligned - 39.0 + 5.0 * i as f64).collect();
    headings.extend(std::iter::repeat(aligned).take(10));
    headings.push(aligned + 30.0);
    stream.push_rotation(&headings, 0, 500);
    stream.push_tilt(0.02, -0.03, 10_000);

    let mut location = MockLocationProvider::with_fix(origin);
    let mut session = CompassSession::start(config, Box::new(stream), &mut location)
        .unwrap()
        .with_year(2020);

    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    session.register_feedback_callback(Box::new(move |event: &FeedbackEvent| {
        sink.borrow_mut().push(event.timestamp_ms)
    }));

    assert_eq!(session.process().unwrap(), headings.len() + 1);

    // 4 degrees off at 3500 ms enters the Accurate tier; cooldown expires after 7500
    assert_eq!(*fired.borrow(), vec![3500, 8000]);

    let snapshot = session.snapshot();
    assert!(snapshot.is_flat);
    let alignment = snapshot.alignment.unwrap();
    assert_eq!(alignment.tier, AccuracyTier::Far);
    assert!((alignment.offset_deg + 30.0).abs() < 1e-6);

    let report = StatusFormatter::new().report(&snapshot);
    assert_eq!(report.headline, "Qibla: 30.0° (Less accurate)");
    assert_eq!(report.color_hex, "#F44336");

    let stats = session.stop();
    assert_eq!(stats.feedback_fired, 2);
    assert_eq!(probe.active_subscriptions(), 0);
}

#[test]
fn test_inclusive_cooldown_session() {
    let origin = GeoPoint::new(31.7767, 35.2345).unwrap();
    let config = EngineConfig::default().with_feedback(FeedbackConfig {
        cooldown_ms: 4000,
        boundary: CooldownBoundary::Inclusive,
    });
    let declination = config.declination.declination(&origin, 2020);
    let aligned = initial_bearing(origin, config.target).degrees() - declination;

    let mut stream = MockSensorStream::new();
    stream.push_rotation(&[aligned; 3], 0, 4000);

    let mut session = CompassSession::start(config, Box::new(stream), &mut MockLocationProvider::with_fix(origin))
        .unwrap()
        .with_year(2020);
    session.process().unwrap();

    assert_eq!(session.stats().feedback_fired, 3);
}

#[test]
fn test_session_without_fix_keeps_tracking_heading() {
    let mut stream = MockSensorStream::new();
    stream.remove_sensor(SensorKind::Tilt);
    stream.push_heading(45.0, 0);
    let probe = stream.probe();

    let mut session = CompassSession::start(
        EngineConfig::default(),
        Box::new(stream),
        &mut MockLocationProvider::no_fix(),
    )
    .unwrap();
    session.process().unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.bearing, BearingStatus::Unavailable(UnavailableReason::NoFix));
    assert!((snapshot.heading.unwrap().degrees() - 45.0).abs() < 1e-9);

    let report = StatusFormatter::new().report(&snapshot);
    assert_eq!(report.headline, "Waiting for location fix");

    drop(session);
    assert_eq!(probe.active_subscriptions(), 0);
}
