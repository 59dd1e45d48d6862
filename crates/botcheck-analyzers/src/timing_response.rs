use botcheck_config::ResponseTimingConfig;
use botcheck_types::TimingAnalysis;
use uuid::Uuid;

/// §4.6: classifies one response's timing against the survey-wide history
/// for the same question. `prior_response_times_ms` excludes this response.
pub fn analyze(
    session_id: Uuid,
    question_id: Uuid,
    response_time_ms: u64,
    prior_response_times_ms: &[u64],
    cfg: &ResponseTimingConfig,
) -> TimingAnalysis {
    let anomaly_z = z_score(response_time_ms, prior_response_times_ms);

    let (speeder_threshold, flatliner_threshold) = if cfg.adaptive_timing_enabled && prior_response_times_ms.len() >= 3 {
        adaptive_thresholds(prior_response_times_ms, cfg)
    } else {
        (cfg.speeder_ms, cfg.flatliner_ms)
    };

    let is_speeder = response_time_ms < speeder_threshold;
    let is_flatliner = response_time_ms > flatliner_threshold;

    TimingAnalysis {
        session_id,
        question_id,
        response_time_ms,
        is_speeder,
        is_flatliner,
        anomaly_z,
    }
}

/// `|z| > threshold` per §4.6; absent history (`anomaly_z = None`) is never
/// itself anomalous.
pub fn is_anomalous(analysis: &TimingAnalysis, cfg: &ResponseTimingConfig) -> bool {
    analysis.anomaly_z.map(|z| z.abs() > cfg.anomaly_z).unwrap_or(false)
}

fn z_score(value: u64, prior: &[u64]) -> Option<f64> {
    if prior.len() < 3 {
        return None;
    }
    let values: Vec<f64> = prior.iter().map(|v| *v as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let stddev = variance.sqrt();
    if stddev < f64::EPSILON {
        return Some(0.0);
    }
    Some((value as f64 - mean) / stddev)
}

/// Shifts the speeder/flatliner thresholds to `mean ± k·stddev`, clamped to
/// the bands documented in §4.6.
fn adaptive_thresholds(prior: &[u64], cfg: &ResponseTimingConfig) -> (u64, u64) {
    let values: Vec<f64> = prior.iter().map(|v| *v as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let stddev = variance.sqrt();

    let speeder = (mean - cfg.adaptive_k * stddev).clamp(500.0, 2_000.0) as u64;
    let flatliner = (mean + cfg.adaptive_k * stddev).clamp(300_000.0, 600_000.0) as u64;
    (speeder, flatliner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_three_priors_means_no_z_score() {
        let cfg = ResponseTimingConfig::default();
        let analysis = analyze(Uuid::nil(), Uuid::nil(), 1_500, &[1000, 2000], &cfg);
        assert!(analysis.anomaly_z.is_none());
    }

    #[test]
    fn fast_response_is_flagged_a_speeder() {
        let cfg = ResponseTimingConfig::default();
        let analysis = analyze(Uuid::nil(), Uuid::nil(), 500, &[], &cfg);
        assert!(analysis.is_speeder);
    }

    #[test]
    fn slow_response_is_flagged_a_flatliner() {
        let cfg = ResponseTimingConfig::default();
        let analysis = analyze(Uuid::nil(), Uuid::nil(), 400_000, &[], &cfg);
        assert!(analysis.is_flatliner);
    }

    #[test]
    fn outlier_against_stable_history_is_anomalous() {
        let cfg = ResponseTimingConfig::default();
        let prior = vec![10_000, 10_100, 9_900, 10_050, 9_950];
        let analysis = analyze(Uuid::nil(), Uuid::nil(), 1_000, &prior, &cfg);
        assert!(is_anomalous(&analysis, &cfg));
    }
}
