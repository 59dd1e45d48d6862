use chrono::{DateTime, Utc};

/// Injectable wall-clock (§4.9). Tests use a fixed or stepped clock so
/// timing-derived scores are deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock, used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_returns_utc_now() {
        let before = Utc::now();
        let got = SystemClock.now();
        assert!(got >= before);
    }
}
