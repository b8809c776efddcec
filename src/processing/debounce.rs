use crate::core::DEFAULT_FEEDBACK_COOLDOWN_MS;
use serde::{Deserialize, Serialize};

/// Whether a firing exactly one cooldown after the last one is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownBoundary {
    /// Fire only once strictly more than the cooldown has elapsed
    Exclusive,
    /// Fire as soon as the cooldown has elapsed
    Inclusive,
}

impl Default for CooldownBoundary {
    fn default() -> Self {
        CooldownBoundary::Exclusive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub cooldown_ms: u64,
    #[serde(default)]
    pub boundary: CooldownBoundary,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_FEEDBACK_COOLDOWN_MS,
            boundary: CooldownBoundary::default(),
        }
    }
}

/// Last time the gate fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceState {
    pub last_fired_ms: Option<u64>,
}

/// Throttles the "aligned" cue so a steady alignment does not retrigger it
/// on every sensor tick.
///
/// Losing alignment does not reset the cooldown: re-aligning inside the
/// window stays silent until the window has passed.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDebouncer {
    config: FeedbackConfig,
    state: DebounceState,
}

impl FeedbackDebouncer {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            state: DebounceState::default(),
        }
    }

    pub fn with_cooldown(cooldown_ms: u64) -> Self {
        Self::new(FeedbackConfig {
            cooldown_ms,
            ..Default::default()
        })
    }

    /// Decide whether to fire the cue at `now_ms`; records the firing if so
    pub fn should_fire(&mut self, is_aligned: bool, now_ms: u64) -> bool {
        if !is_aligned {
            return false;
        }

        let eligible = match self.state.last_fired_ms {
            None => true,
            // A clock running backwards never counts as elapsed time
            Some(last) if now_ms < last => false,
            Some(last) => {
                let elapsed = now_ms - last;
                match self.config.boundary {
                    CooldownBoundary::Exclusive => elapsed > self.config.cooldown_ms,
                    CooldownBoundary::Inclusive => elapsed >= self.config.cooldown_ms,
                }
            }
        };

        if eligible {
            self.state.last_fired_ms = Some(now_ms);
        }
        eligible
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn config(&self) -> FeedbackConfig {
        self.config
    }

    pub fn reset(&mut self) {
        self.state = DebounceState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_boundary_sequence() {
        let mut debouncer = FeedbackDebouncer::with_cooldown(4000);
        assert!(debouncer.should_fire(true, 0));
        assert!(!debouncer.should_fire(true, 1000));
        assert!(!debouncer.should_fire(true, 4000));
        assert!(debouncer.should_fire(true, 4001));
        assert_eq!(debouncer.state().last_fired_ms, Some(4001));
    }

    #[test]
    fn test_inclusive_boundary_sequence() {
        let mut debouncer = FeedbackDebouncer::new(FeedbackConfig {
            cooldown_ms: 4000,
            boundary: CooldownBoundary::Inclusive,
        });
        assert!(debouncer.should_fire(true, 0));
        assert!(!debouncer.should_fire(true, 1000));
        assert!(debouncer.should_fire(true, 4000));
        // The window restarts from the 4000 ms firing
        assert!(!debouncer.should_fire(true, 4001));
        assert!(debouncer.should_fire(true, 8000));
    }

    #[test]
    fn test_not_aligned_never_fires() {
        let mut debouncer = FeedbackDebouncer::default();
        assert!(!debouncer.should_fire(false, 0));
        assert!(!debouncer.should_fire(false, 10_000));
        assert_eq!(debouncer.state().last_fired_ms, None);
        assert!(debouncer.should_fire(true, 10_001));
    }

    #[test]
    fn test_realignment_inside_cooldown_stays_silent() {
        let mut debouncer = FeedbackDebouncer::default();
        assert!(debouncer.should_fire(true, 0));
        assert!(!debouncer.should_fire(false, 500));
        assert!(!debouncer.should_fire(true, 900));
        assert!(debouncer.should_fire(true, 4500));
    }

    #[test]
    fn test_ten_hertz_alignment_fires_once_per_window() {
        let mut debouncer = FeedbackDebouncer::default();
        let fired = (0..100u64)
            .map(|tick| tick * 100)
            .filter(|&t| debouncer.should_fire(true, t))
            .count();
        // 0 ms, 4100 ms and 8200 ms over ten seconds
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut debouncer = FeedbackDebouncer::default();
        assert!(debouncer.should_fire(true, 10_000));
        assert!(!debouncer.should_fire(true, 2_000));
        assert_eq!(debouncer.state().last_fired_ms, Some(10_000));
    }

    #[test]
    fn test_reset() {
        let mut debouncer = FeedbackDebouncer::default();
        assert!(debouncer.should_fire(true, 0));
        debouncer.reset();
        assert!(debouncer.should_fire(true, 1));
    }
}
