use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Longest step a single frame may advance an animation
pub const DEFAULT_MAX_STEP: Duration = Duration::from_millis(100);

/// Frame clock for animated scenes.
///
/// Frames only run on demand, so the gap between two ticks can be arbitrarily long
/// (window hidden, no input). Each step is capped so animations resume where they
/// stopped instead of jumping.
#[derive(Debug)]
pub struct Clock {
    last_tick: Option<Instant>,
    max_step: Duration,
    phase: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::with_max_step(DEFAULT_MAX_STEP)
    }

    pub fn with_max_step(max_step: Duration) -> Self {
        Self {
            last_tick: None,
            max_step,
            phase: 0.0,
        }
    }

    /// Seconds since the previous tick, capped at `max_step`. The first tick returns 0.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let step = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
            .min(self.max_step);
        self.last_tick = Some(now);
        step.as_secs_f32()
    }

    /// Advance the phase by `rate` radians per second and return it, wrapped to [0, 2π)
    pub fn advance(&mut self, rate: f32) -> f32 {
        let step = self.tick();
        self.step_phase(step, rate)
    }

    fn step_phase(&mut self, step: f32, rate: f32) -> f32 {
        self.phase = (self.phase + step * rate).rem_euclid(TAU);
        self.phase
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Forget the last tick so the next frame starts from zero
    pub fn pause(&mut self) {
        self.last_tick = None;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
