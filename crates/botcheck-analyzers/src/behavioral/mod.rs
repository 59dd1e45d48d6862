mod device;
mod keystroke;
mod mouse;
mod network;
mod timing;

use botcheck_config::Config;
use botcheck_types::Event;
use std::collections::BTreeMap;

/// Weights from §4.2.6. Network stays neutral until request metadata is
/// available at this layer, so its weight is deliberately the smallest.
const KEYSTROKE_WEIGHT: f64 = 0.30;
const MOUSE_WEIGHT: f64 = 0.25;
const TIMING_WEIGHT: f64 = 0.20;
const DEVICE_WEIGHT: f64 = 0.15;
const NETWORK_WEIGHT: f64 = 0.10;

/// Per-method scores plus the weighted composite (§4.2.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehavioralScores {
    pub keystroke: f64,
    pub mouse: f64,
    pub timing: f64,
    pub device: f64,
    pub network: f64,
    pub confidence: f64,
}

impl BehavioralScores {
    /// Session is classified bot by behavioral signal alone when
    /// `confidence > 0.70` (strict, distinct from the composite's `>=`).
    pub fn is_bot_by_behavioral_alone(&self) -> bool {
        self.confidence > 0.70
    }

    pub fn method_scores(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("keystroke".to_string(), self.keystroke);
        map.insert("mouse".to_string(), self.mouse);
        map.insert("timing".to_string(), self.timing);
        map.insert("device".to_string(), self.device);
        map.insert("network".to_string(), self.network);
        map
    }
}

/// Runs all five behavioral analyzers over `events` and blends them per
/// §4.2.6.
pub fn analyze(events: &[Event], cfg: &Config) -> BehavioralScores {
    let keystroke_score = keystroke::score(events, &cfg.keystroke, cfg.min_event_count_keystroke);
    let mouse_score = mouse::score(events, &cfg.mouse);
    let timing_score = timing::score(events, &cfg.session_timing, cfg.min_event_count_timing);
    let device_score = device::score(events, &cfg.bot_resolutions);
    let network_score = network::score(events);

    let confidence = KEYSTROKE_WEIGHT * keystroke_score
        + MOUSE_WEIGHT * mouse_score
        + TIMING_WEIGHT * timing_score
        + DEVICE_WEIGHT * device_score
        + NETWORK_WEIGHT * network_score;

    BehavioralScores {
        keystroke: keystroke_score,
        mouse: mouse_score,
        timing: timing_score,
        device: device_score,
        network: network_score,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_events_is_neutral_across_the_board() {
        let cfg = Config::default();
        let scores = analyze(&[], &cfg);
        assert_eq!(scores.keystroke, 0.5);
        assert_eq!(scores.mouse, 0.5);
        assert_eq!(scores.timing, 0.5);
        assert_eq!(scores.device, 0.0);
        assert_eq!(scores.network, 0.5);
    }

    #[test]
    fn confidence_is_the_weighted_sum_of_method_scores() {
        let cfg = Config::default();
        let scores = analyze(&[], &cfg);
        let expected = 0.30 * 0.5 + 0.25 * 0.5 + 0.20 * 0.5 + 0.15 * 0.0 + 0.10 * 0.5;
        assert!((scores.confidence - expected).abs() < 1e-9);
    }
}
