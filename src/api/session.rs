//! Tracking session for event-driven platforms
//!
//! A session owns the sensor subscriptions and all mutable engine state for
//! one period of compass use. Every mutation goes through `&mut self`, so a
//! session is driven from a single execution context. Subscriptions are
//! released on every exit path: [`CompassSession::stop`], drop, and a failed
//! [`CompassSession::start`].

use crate::algorithms::alignment::{AlignmentClassifier, AlignmentResult};
use crate::algorithms::bearing::initial_bearing;
use crate::api::types::{
    BearingStatus, EngineSnapshot, FeedbackEvent, SessionError, SessionResult, SessionStats,
    UnavailableReason,
};
use crate::core::{GeoPoint, RawSensorSample, SensorKind};
use crate::hardware::{LocationError, LocationProvider, SensorStream, SubscriptionId};
use crate::processing::debounce::FeedbackDebouncer;
use crate::processing::heading::HeadingTracker;
use crate::utils::config::EngineConfig;
use chrono::Datelike;
use std::collections::HashMap;

/// Callback invoked when alignment feedback fires
pub type FeedbackCallback = Box<dyn FnMut(&FeedbackEvent)>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

pub struct CompassSession {
    config: EngineConfig,
    sensors: Box<dyn SensorStream>,
    subscriptions: Vec<SubscriptionId>,
    tracker: HeadingTracker,
    classifier: AlignmentClassifier,
    debouncer: FeedbackDebouncer,
    bearing: BearingStatus,
    year: i32,
    last_alignment: Option<AlignmentResult>,
    last_sample_ms: Option<u64>,
    callback_counter: u32,
    feedback_callbacks: HashMap<CallbackHandle, FeedbackCallback>,
    stats: SessionStats,
}

impl CompassSession {
    /// Subscribe to the sensors and take an initial fix.
    ///
    /// A missing or unavailable fix still starts the session, reporting the
    /// bearing as unavailable. Permission denial and sensor failures abort
    /// start-up after releasing whatever was already subscribed.
    pub fn start(
        config: EngineConfig,
        sensors: Box<dyn SensorStream>,
        location: &mut dyn LocationProvider,
    ) -> SessionResult<Self> {
        config.validate()?;

        let mut session = Self {
            tracker: HeadingTracker::new(config.tracker_config()),
            classifier: AlignmentClassifier::new(config.tiers),
            debouncer: FeedbackDebouncer::new(config.feedback),
            config,
            sensors,
            subscriptions: Vec::new(),
            bearing: BearingStatus::Unavailable(UnavailableReason::NoFix),
            year: chrono::Local::now().year(),
            last_alignment: None,
            last_sample_ms: None,
            callback_counter: 0,
            feedback_callbacks: HashMap::new(),
            stats: SessionStats::default(),
        };

        // Early returns below drop `session`, which unsubscribes.
        session.subscribe(SensorKind::Magnetic)?;
        if session.sensors.is_available(SensorKind::Tilt) {
            session.subscribe(SensorKind::Tilt)?;
        } else {
            tracing::debug!("no tilt sensor, flatness warning disabled");
        }

        session.refresh_fix(location)?;
        tracing::debug!(
            subscriptions = session.subscriptions.len(),
            bearing_available = session.bearing.is_available(),
            "compass session started"
        );
        Ok(session)
    }

    /// Use a fixed year for declination instead of the current one
    pub fn with_year(mut self, year: i32) -> Self {
        self.set_year(year);
        self
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
        if let Some(origin) = self.bearing.origin() {
            self.update_fix(Some(origin));
        }
    }

    /// Ask the provider for a fresh fix and recompute the target bearing
    pub fn refresh_fix(&mut self, location: &mut dyn LocationProvider) -> SessionResult<()> {
        match location.current_fix() {
            Ok(fix) => {
                self.update_fix(fix);
                Ok(())
            }
            Err(LocationError::PermissionDenied) => {
                tracing::debug!("location permission denied");
                self.set_unavailable(UnavailableReason::PermissionDenied);
                Err(SessionError::LocationPermissionDenied)
            }
            Err(LocationError::Unavailable { reason }) => {
                tracing::debug!(%reason, "location unavailable");
                self.set_unavailable(UnavailableReason::LocationUnavailable { detail: reason });
                Ok(())
            }
        }
    }

    /// Replace the current fix. `None` makes the bearing unavailable rather
    /// than computing against stale coordinates.
    pub fn update_fix(&mut self, fix: Option<GeoPoint>) {
        let Some(origin) = fix else {
            self.set_unavailable(UnavailableReason::NoFix);
            return;
        };

        let bearing = initial_bearing(origin, self.config.target);
        let declination_deg = self.config.declination.declination(&origin, self.year);
        tracing::debug!(%origin, %bearing, declination_deg, "target bearing updated");

        self.bearing = BearingStatus::Available {
            origin,
            bearing,
            declination_deg,
        };
        self.stats.fix_updates += 1;
        self.reclassify();
    }

    /// Feed one sample pushed by the platform. Returns the feedback event if
    /// this sample triggered one.
    pub fn ingest(&mut self, sample: &RawSensorSample) -> Option<FeedbackEvent> {
        let rejected_before = self.tracker.rejected_samples();
        self.tracker.ingest(sample);
        if self.tracker.rejected_samples() != rejected_before {
            self.stats.samples_rejected += 1;
            return None;
        }

        self.stats.samples_ingested += 1;
        self.last_sample_ms = Some(sample.timestamp_ms);

        if sample.kind != SensorKind::Magnetic {
            return None;
        }

        let alignment = self.reclassify()?;
        if !self.debouncer.should_fire(alignment.is_aligned(), sample.timestamp_ms) {
            return None;
        }

        let event = FeedbackEvent {
            timestamp_ms: sample.timestamp_ms,
            alignment,
        };
        self.stats.feedback_fired += 1;
        tracing::info!(offset_deg = alignment.offset_deg, "aligned with target");
        for callback in self.feedback_callbacks.values_mut() {
            callback(&event);
        }
        Some(event)
    }

    /// Drain every pending sample from the sensor stream.
    /// Returns the number of samples read.
    pub fn process(&mut self) -> SessionResult<usize> {
        let mut count = 0;
        while let Some(sample) = self.sensors.poll_sample()? {
            self.ingest(&sample);
            count += 1;
        }
        Ok(count)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            heading: self.tracker.heading(),
            bearing: self.bearing.clone(),
            alignment: self.last_alignment,
            is_flat: self.tracker.is_flat(),
            last_sample_ms: self.last_sample_ms,
        }
    }

    pub fn bearing_status(&self) -> &BearingStatus {
        &self.bearing
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn register_feedback_callback(&mut self, callback: FeedbackCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.feedback_callbacks.insert(handle, callback);
        handle
    }

    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> SessionResult<()> {
        self.feedback_callbacks
            .remove(&handle)
            .map(|_| ())
            .ok_or(SessionError::UnknownCallback(handle.id()))
    }

    pub fn callback_count(&self) -> usize {
        self.feedback_callbacks.len()
    }

    /// End the session, releasing subscriptions and discarding tracker and
    /// debounce state
    pub fn stop(mut self) -> SessionStats {
        self.release();
        tracing::debug!(stats = ?self.stats, "compass session stopped");
        self.stats
    }

    fn subscribe(&mut self, kind: SensorKind) -> SessionResult<()> {
        let id = self.sensors.subscribe(kind, self.config.sampling_interval_ms)?;
        self.subscriptions.push(id);
        Ok(())
    }

    fn release(&mut self) {
        for id in self.subscriptions.drain(..) {
            if let Err(err) = self.sensors.unsubscribe(id) {
                tracing::warn!(error = %err, "failed to release sensor subscription");
            }
        }
        self.feedback_callbacks.clear();
        self.tracker.reset();
        self.debouncer.reset();
        self.last_alignment = None;
    }

    fn set_unavailable(&mut self, reason: UnavailableReason) {
        self.bearing = BearingStatus::Unavailable(reason);
        self.last_alignment = None;
    }

    fn reclassify(&mut self) -> Option<AlignmentResult> {
        let alignment = match (&self.bearing, self.tracker.heading()) {
            (BearingStatus::Available { bearing, declination_deg, .. }, Some(heading)) => {
                Some(self.classifier.classify(*bearing, heading, *declination_deg))
            }
            _ => None,
        };
        self.last_alignment = alignment;
        alignment
    }
}

impl Drop for CompassSession {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            self.release();
        }
    }
}
