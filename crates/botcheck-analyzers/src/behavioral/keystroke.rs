use botcheck_config::KeystrokeConfig;
use botcheck_types::{Event, EventPayload};

/// §4.2.1: pure function over a session's keystroke events.
pub fn score(events: &[Event], cfg: &KeystrokeConfig, min_events: usize) -> f64 {
    let keystrokes: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::Keystroke(_)))
        .collect();

    if keystrokes.len() < min_events {
        return 0.5;
    }

    let deltas: Vec<f64> = keystrokes
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_milliseconds() as f64)
        .filter(|d| *d > 0.0)
        .collect();

    if deltas.len() < 4 {
        return 0.5;
    }

    let mean = mean(&deltas);
    let stddev = stddev(&deltas, mean);
    let round_share = deltas.iter().filter(|d| (**d % 10.0).abs() < f64::EPSILON).count() as f64
        / deltas.len() as f64;

    let check_regular = stddev < cfg.regular_ms;
    let check_fast = mean < cfg.fast_ms;
    let check_slow = mean > cfg.slow_ms;
    let check_round = round_share > cfg.round_share;

    let passed = [check_regular, check_fast, check_slow, check_round]
        .iter()
        .filter(|c| **c)
        .count();

    (passed as f64 / 4.0).min(1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn stddev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_types::KeystrokePayload;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn keystroke_at(offset_ms: i64) -> Event {
        Event {
            session_id: Uuid::nil(),
            timestamp: Utc::now() + Duration::milliseconds(offset_ms),
            payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
            element_id: None,
            element_type: None,
        }
    }

    #[test]
    fn insufficient_events_returns_neutral() {
        let cfg = KeystrokeConfig::default();
        let events = vec![keystroke_at(0), keystroke_at(100)];
        assert_eq!(score(&events, &cfg, 5), 0.5);
    }

    #[test]
    fn perfectly_regular_keystrokes_score_high() {
        let cfg = KeystrokeConfig::default();
        let events: Vec<Event> = (0..10).map(|i| keystroke_at(i * 100)).collect();
        let s = score(&events, &cfg, 5);
        assert!(s >= 0.75, "expected robotic typist to score high, got {s}");
    }

    #[test]
    fn naturally_varied_keystrokes_score_low() {
        let cfg = KeystrokeConfig::default();
        let offsets = [0, 180, 410, 560, 790, 1020, 1340, 1510, 1800, 2050];
        let events: Vec<Event> = offsets.iter().map(|o| keystroke_at(*o)).collect();
        let s = score(&events, &cfg, 5);
        assert!(s < 0.5, "expected human typing cadence to score low, got {s}");
    }
}
