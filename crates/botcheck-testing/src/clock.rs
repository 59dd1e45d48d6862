use botcheck_core::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Deterministic `Clock` that advances by a fixed step on every `now()`
/// call, so session/processing durations in fixtures are reproducible
/// instead of depending on wall-clock jitter.
pub struct SteppedClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppedClock {
    pub fn starting_at(start: DateTime<Utc>, step: Duration) -> Self {
        Self { current: Mutex::new(start), step }
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().expect("clock mutex poisoned");
        let value = *current;
        *current += self.step;
        value
    }
}
