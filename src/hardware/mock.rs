//! Mock sensor stream and location provider for testing and demos

use crate::core::{GeoPoint, RawSensorSample, SensorKind};
use crate::hardware::{
    LocationError, LocationProvider, SensorError, SensorResult, SensorStream, SubscriptionId,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

#[derive(Debug, Default)]
struct ProbeCounters {
    active: HashMap<SubscriptionId, SensorKind>,
    subscribe_calls: u32,
    unsubscribe_calls: u32,
    last_interval_ms: Option<u32>,
}

/// Shared view into a [`MockSensorStream`] that outlives the stream itself,
/// so tests can check that every subscription was released.
#[derive(Debug, Clone, Default)]
pub struct MockSensorProbe {
    counters: Rc<RefCell<ProbeCounters>>,
}

impl MockSensorProbe {
    pub fn active_subscriptions(&self) -> usize {
        self.counters.borrow().active.len()
    }

    pub fn is_subscribed(&self, kind: SensorKind) -> bool {
        self.counters.borrow().active.values().any(|k| *k == kind)
    }

    pub fn subscribe_calls(&self) -> u32 {
        self.counters.borrow().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> u32 {
        self.counters.borrow().unsubscribe_calls
    }

    pub fn last_interval_ms(&self) -> Option<u32> {
        self.counters.borrow().last_interval_ms
    }
}

/// Scripted sensor stream
pub struct MockSensorStream {
    queue: VecDeque<RawSensorSample>,
    unavailable: HashSet<SensorKind>,
    rejected: HashSet<SensorKind>,
    next_id: u32,
    closed: bool,
    probe: MockSensorProbe,
}

impl MockSensorStream {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            unavailable: HashSet::new(),
            rejected: HashSet::new(),
            next_id: 1,
            closed: false,
            probe: MockSensorProbe::default(),
        }
    }

    pub fn probe(&self) -> MockSensorProbe {
        self.probe.clone()
    }

    pub fn push_sample(&mut self, sample: RawSensorSample) {
        self.queue.push_back(sample);
    }

    /// Queue a magnetometer reading that points at `heading_deg`
    pub fn push_heading(&mut self, heading_deg: f64, timestamp_ms: u64) {
        let radians = heading_deg.to_radians();
        self.push_sample(RawSensorSample::magnetic(radians.cos(), radians.sin(), 0.0, timestamp_ms));
    }

    /// Queue a sweep of headings spaced `step_ms` apart
    pub fn push_rotation(&mut self, headings_deg: &[f64], start_ms: u64, step_ms: u64) {
        for (i, heading) in headings_deg.iter().enumerate() {
            self.push_heading(*heading, start_ms + step_ms * i as u64);
        }
    }

    pub fn push_tilt(&mut self, x: f64, y: f64, timestamp_ms: u64) {
        self.push_sample(RawSensorSample::tilt(x, y, 0.0, timestamp_ms));
    }

    /// Pretend the device lacks a sensor of this kind
    pub fn remove_sensor(&mut self, kind: SensorKind) {
        self.unavailable.insert(kind);
    }

    /// Make the next subscriptions of this kind fail
    pub fn reject_subscriptions(&mut self, kind: SensorKind) {
        self.rejected.insert(kind);
    }

    /// Simulate the platform tearing the stream down
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn queued_sample_count(&self) -> usize {
        self.queue.len()
    }
}

impl Default for MockSensorStream {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorStream for MockSensorStream {
    fn subscribe(&mut self, kind: SensorKind, interval_ms: u32) -> SensorResult<SubscriptionId> {
        let mut counters = self.probe.counters.borrow_mut();
        counters.subscribe_calls += 1;

        if self.unavailable.contains(&kind) {
            return Err(SensorError::Unavailable(kind));
        }
        if self.rejected.contains(&kind) {
            return Err(SensorError::SubscriptionRejected {
                kind,
                reason: "rejected by mock".to_string(),
            });
        }

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        counters.active.insert(id, kind);
        counters.last_interval_ms = Some(interval_ms);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> SensorResult<()> {
        let mut counters = self.probe.counters.borrow_mut();
        counters.unsubscribe_calls += 1;
        counters
            .active
            .remove(&id)
            .map(|_| ())
            .ok_or(SensorError::UnknownSubscription(id))
    }

    fn poll_sample(&mut self) -> SensorResult<Option<RawSensorSample>> {
        if self.closed {
            return Err(SensorError::StreamClosed);
        }

        let counters = self.probe.counters.borrow();
        // Samples for sensors nobody listens to are dropped, as on a real device
        while let Some(sample) = self.queue.pop_front() {
            if counters.active.values().any(|k| *k == sample.kind) {
                return Ok(Some(sample));
            }
        }
        Ok(None)
    }

    fn is_available(&self, kind: SensorKind) -> bool {
        !self.unavailable.contains(&kind)
    }
}

/// Scripted location provider returning queued results in order, then
/// repeating the last one
pub struct MockLocationProvider {
    responses: VecDeque<Result<Option<GeoPoint>, LocationError>>,
    last: Result<Option<GeoPoint>, LocationError>,
    calls: u32,
}

impl MockLocationProvider {
    pub fn with_fix(point: GeoPoint) -> Self {
        Self::scripted(vec![Ok(Some(point))])
    }

    pub fn no_fix() -> Self {
        Self::scripted(vec![Ok(None)])
    }

    pub fn denied() -> Self {
        Self::scripted(vec![Err(LocationError::PermissionDenied)])
    }

    pub fn unavailable(reason: &str) -> Self {
        Self::scripted(vec![Err(LocationError::unavailable(reason))])
    }

    pub fn scripted(responses: Vec<Result<Option<GeoPoint>, LocationError>>) -> Self {
        Self {
            responses: responses.into(),
            last: Ok(None),
            calls: 0,
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl LocationProvider for MockLocationProvider {
    fn current_fix(&mut self) -> Result<Option<GeoPoint>, LocationError> {
        self.calls += 1;
        if let Some(next) = self.responses.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_accounting() {
        let mut stream = MockSensorStream::new();
        let probe = stream.probe();

        let mag = stream.subscribe(SensorKind::Magnetic, 100).unwrap();
        let tilt = stream.subscribe(SensorKind::Tilt, 100).unwrap();
        assert_ne!(mag, tilt);
        assert_eq!(probe.active_subscriptions(), 2);
        assert_eq!(probe.last_interval_ms(), Some(100));

        stream.unsubscribe(mag).unwrap();
        assert!(!probe.is_subscribed(SensorKind::Magnetic));
        assert!(probe.is_subscribed(SensorKind::Tilt));
        assert_eq!(stream.unsubscribe(mag), Err(SensorError::UnknownSubscription(mag)));

        drop(stream);
        assert_eq!(probe.active_subscriptions(), 1);
    }

    #[test]
    fn test_failure_injection() {
        let mut stream = MockSensorStream::new();
        stream.remove_sensor(SensorKind::Tilt);
        stream.reject_subscriptions(SensorKind::Magnetic);

        assert!(!stream.is_available(SensorKind::Tilt));
        assert_eq!(stream.subscribe(SensorKind::Tilt, 100), Err(SensorError::Unavailable(SensorKind::Tilt)));
        assert!(matches!(
            stream.subscribe(SensorKind::Magnetic, 100),
            Err(SensorError::SubscriptionRejected { .. })
        ));
        assert_eq!(stream.probe().active_subscriptions(), 0);
    }

    #[test]
    fn test_poll_only_delivers_subscribed_kinds() {
        let mut stream = MockSensorStream::new();
        stream.push_tilt(0.0, 0.0, 0);
        stream.push_heading(90.0, 10);
        stream.subscribe(SensorKind::Magnetic, 100).unwrap();

        let sample = stream.poll_sample().unwrap().unwrap();
        assert_eq!(sample.kind, SensorKind::Magnetic);
        assert!((sample.axes.y - 1.0).abs() < 1e-12);
        assert_eq!(stream.poll_sample().unwrap(), None);

        stream.close();
        assert_eq!(stream.poll_sample(), Err(SensorError::StreamClosed));
    }

    #[test]
    fn test_scripted_locations() {
        let mecca = GeoPoint::kaaba();
        let mut provider = MockLocationProvider::scripted(vec![
            Err(LocationError::unavailable("cold start")),
            Ok(None),
            Ok(Some(mecca)),
        ]);

        assert!(matches!(provider.current_fix(), Err(LocationError::Unavailable { .. })));
        assert_eq!(provider.current_fix(), Ok(None));
        assert_eq!(provider.current_fix(), Ok(Some(mecca)));
        assert_eq!(provider.current_fix(), Ok(Some(mecca)));
        assert_eq!(provider.calls(), 4);
    }
}
