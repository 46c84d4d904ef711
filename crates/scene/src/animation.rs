use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Tuning for the limb swing and body turn.
///
/// The bounds are asymmetric on purpose; they reproduce the original gait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Minimum time between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Swing angle change applied on every tick.
    pub swing_step: f32,
    /// Crossing above this flips to [`SwingPhase::Retracting`].
    pub swing_upper: f32,
    /// Crossing below this flips to [`SwingPhase::Extending`].
    pub swing_lower: f32,
    /// Swing angle at startup.
    pub initial_swing: f32,
    /// Time for one full body turn, in milliseconds.
    pub turn_period_ms: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            swing_step: 0.003,
            swing_upper: 0.08,
            swing_lower: -0.088,
            initial_swing: -0.08,
            turn_period_ms: 10_000.0,
        }
    }
}

impl AnimationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Direction the limbs are currently swinging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwingPhase {
    #[default]
    Extending,
    Retracting,
}

/// Mutable animation parameters. Owned by the frame driver, read by the
/// scene composer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Body turn in radians. Only ever grows.
    pub body_rotation: f32,
    pub swing_angle: f32,
    pub phase: SwingPhase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

impl AnimationState {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            body_rotation: 0.0,
            swing_angle: config.initial_swing,
            phase: SwingPhase::Extending,
        }
    }

    /// Advance by one tick that covered `elapsed` wall time.
    ///
    /// The phase is checked before stepping, so the angle overshoots a bound
    /// by at most one step.
    pub fn tick(&mut self, elapsed: Duration, config: &AnimationConfig) {
        let t_ms = elapsed.as_secs_f32() * 1000.0;
        self.body_rotation += (t_ms * 360.0 / config.turn_period_ms).to_radians();

        match self.phase {
            SwingPhase::Extending if self.swing_angle > config.swing_upper => {
                self.phase = SwingPhase::Retracting;
                tracing::debug!(angle = self.swing_angle, "swing phase -> retracting");
            }
            SwingPhase::Retracting if self.swing_angle < config.swing_lower => {
                self.phase = SwingPhase::Extending;
                tracing::debug!(angle = self.swing_angle, "swing phase -> extending");
            }
            _ => {}
        }

        match self.phase {
            SwingPhase::Extending => self.swing_angle += config.swing_step,
            SwingPhase::Retracting => self.swing_angle -= config.swing_step,
        }
    }
}

/// Fires at most once per interval against a monotonic clock.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    last: Instant,
}

impl TickTimer {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    /// Returns the elapsed time since the previous tick if at least one
    /// interval has passed, and restarts the interval from `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last);
        if elapsed >= self.interval {
            self.last = now;
            Some(elapsed)
        } else {
            None
        }
    }

    /// Instant at which the next tick becomes due.
    pub fn deadline(&self) -> Instant {
        self.last + self.interval
    }
}
