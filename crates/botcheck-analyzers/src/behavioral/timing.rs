use botcheck_config::SessionTimingConfig;
use botcheck_types::Event;

/// §4.2.3: session-wide pure timing function, distinct from the
/// per-response `TimingAnalyzer` in `botcheck-analyzers::timing_response`.
pub fn score(events: &[Event], cfg: &SessionTimingConfig, min_events: usize) -> f64 {
    if events.len() < min_events {
        return 0.5;
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    let duration_s = (sorted[sorted.len() - 1].timestamp - sorted[0].timestamp).num_milliseconds() as f64 / 1000.0;
    let short_session = duration_s < cfg.min_duration_s;

    let high_rate = if duration_s > 0.0 {
        sorted.len() as f64 / duration_s > cfg.max_rate_ev_s
    } else {
        true
    };

    let intervals: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_milliseconds() as f64 / 1000.0)
        .collect();
    let too_regular = if intervals.is_empty() {
        false
    } else {
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let variance = intervals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / intervals.len() as f64;
        variance.sqrt() < cfg.interval_stddev_s
    };

    let passed = [short_session, high_rate, too_regular].iter().filter(|c| **c).count();
    passed as f64 / 3.0
}
