use std::time::Instant;

/// Converts variable frame time into a whole number of fixed simulation steps.
///
/// Catch-up is bounded: one `advance` call runs at most `max_steps` steps, and the
/// carried backlog is capped at another `max_steps` worth so that a long stall
/// cannot snowball into an ever-growing queue of steps.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick_delta: f64,
    accumulator: f64,
    max_steps: u32,
}

impl TickClock {
    pub fn new(tick_rate: u32, max_steps: u32) -> Self {
        Self {
            tick_delta: 1.0 / f64::from(tick_rate.max(1)),
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Seconds per simulation step.
    pub fn tick_delta(&self) -> f64 {
        self.tick_delta
    }

    /// Wall time accumulated but not yet consumed by a step.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add elapsed wall time and return how many steps to run now.
    ///
    /// Non-finite or negative elapsed times are ignored.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut steps = 0;
        while self.accumulator >= self.tick_delta && steps < self.max_steps {
            self.accumulator -= self.tick_delta;
            steps += 1;
        }

        if steps == self.max_steps && self.accumulator >= self.tick_delta {
            let backlog_cap = self.tick_delta * f64::from(self.max_steps);
            if self.accumulator > backlog_cap {
                tracing::warn!(
                    dropped_seconds = self.accumulator - backlog_cap,
                    "tick backlog capped"
                );
                self.accumulator = backlog_cap;
            } else {
                tracing::debug!(
                    backlog_seconds = self.accumulator,
                    "step cap reached, carrying backlog"
                );
            }
        }

        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Source of elapsed wall time between consecutive frames.
pub trait FrameClock {
    /// Seconds since the previous call.
    fn elapsed_seconds(&mut self) -> f64;
}

/// Frame clock backed by `std::time::Instant`.
#[derive(Debug)]
pub struct InstantClock {
    last: Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl FrameClock for InstantClock {
    fn elapsed_seconds(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed.as_secs_f64()
    }
}
