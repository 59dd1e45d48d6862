use botcheck_config::GridConfig;
use botcheck_types::GridResponseRow;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPattern {
    Diagonal,
    ReverseDiagonal,
    Zigzag,
}

/// §4.5 structural analysis of one grid question's rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAnalysis {
    pub straight_lined: bool,
    pub straightline_confidence: f64,
    pub pattern: Option<GridPattern>,
    pub variance_score: f64,
    pub satisficing_score: f64,
}

/// Rows must already be sorted by `row_id` for pattern detection to be
/// meaningful; the store returns them in that order.
pub fn analyze(rows: &[GridResponseRow], cfg: &GridConfig) -> Option<GridAnalysis> {
    if rows.len() < cfg.min_rows {
        return None;
    }

    let (straight_lined, straightline_confidence) = straightlining(rows, cfg);
    let pattern = if rows.len() >= cfg.pattern_min_rows {
        detect_pattern(rows)
    } else {
        None
    };
    let variance_score = variance_score(rows);
    let satisficing_score = satisficing_score(rows, variance_score);

    Some(GridAnalysis {
        straight_lined,
        straightline_confidence,
        pattern,
        variance_score,
        satisficing_score,
    })
}

fn straightlining(rows: &[GridResponseRow], cfg: &GridConfig) -> (bool, f64) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.value.as_str()).or_insert(0) += 1;
    }
    let modal_count = counts.values().copied().max().unwrap_or(0);
    let share = modal_count as f64 / rows.len() as f64;
    let flagged = share >= cfg.straightline_share;

    let confidence = if flagged {
        (share * (1.0 + (rows.len() as f64 - 2.0) * 0.02)).min(0.95)
    } else {
        0.0
    };
    (flagged, confidence)
}

fn numeric_values(rows: &[GridResponseRow]) -> Option<Vec<f64>> {
    rows.iter().map(|r| r.value.trim().parse::<f64>().ok()).collect()
}

fn detect_pattern(rows: &[GridResponseRow]) -> Option<GridPattern> {
    let values = numeric_values(rows)?;
    let n = values.len();

    let is_diagonal = values.windows(2).all(|w| w[1] > w[0]);
    if is_diagonal {
        return Some(GridPattern::Diagonal);
    }

    let is_reverse_diagonal = values.windows(2).all(|w| w[1] < w[0]);
    if is_reverse_diagonal {
        return Some(GridPattern::ReverseDiagonal);
    }

    let is_zigzag = n >= 3
        && values.windows(2).enumerate().all(|(i, w)| {
            if i % 2 == 0 {
                w[1] > w[0]
            } else {
                w[1] < w[0]
            }
        });
    if is_zigzag {
        return Some(GridPattern::Zigzag);
    }

    None
}

fn variance_score(rows: &[GridResponseRow]) -> f64 {
    match numeric_values(rows) {
        Some(values) if values.len() > 1 => {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            let stddev = variance.sqrt();
            let range = values.iter().cloned().fold(f64::MIN, f64::max)
                - values.iter().cloned().fold(f64::MAX, f64::min);
            if range <= 0.0 {
                0.0
            } else {
                (stddev / range).min(1.0)
            }
        }
        _ => category_entropy(rows),
    }
}

fn category_entropy(rows: &[GridResponseRow]) -> f64 {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.value.as_str()).or_insert(0) += 1;
    }
    let n = rows.len() as f64;
    let categories = counts.len();
    if categories <= 1 {
        return 0.0;
    }
    let entropy: f64 = counts
        .values()
        .map(|c| {
            let p = *c as f64 / n;
            -p * p.log2()
        })
        .sum();
    (entropy / (categories as f64).log2()).min(1.0)
}

fn satisficing_score(rows: &[GridResponseRow], variance_score: f64) -> f64 {
    let low_variance_component = 1.0 - variance_score;
    let timings: Vec<u64> = rows.iter().filter_map(|r| r.response_time_ms).collect();

    if timings.len() < rows.len() || timings.is_empty() {
        return low_variance_component;
    }

    let mean_ms = timings.iter().sum::<u64>() as f64 / timings.len() as f64;
    let fast_component = (1.0 - (mean_ms / 2000.0)).clamp(0.0, 1.0);
    0.5 * low_variance_component + 0.5 * fast_component
}
