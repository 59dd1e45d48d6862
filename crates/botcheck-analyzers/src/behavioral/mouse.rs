use botcheck_config::MouseConfig;
use botcheck_types::{Event, EventPayload};

/// §4.2.2: pure function over a session's mouse events.
pub fn score(events: &[Event], cfg: &MouseConfig) -> f64 {
    let mouse_events: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::MouseMove(_) | EventPayload::MouseClick(_)))
        .collect();

    if mouse_events.len() < 3 {
        return 0.5;
    }

    let moves: Vec<(f64, f64, chrono::DateTime<chrono::Utc>)> = mouse_events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::MouseMove(m) => Some((m.x, m.y, e.timestamp)),
            _ => None,
        })
        .collect();

    let straight_line = is_straight_line(&moves);
    let speed_flag = exceeds_max_speed(&moves, cfg.max_speed_px_s);
    let precision_flag = clicks_too_precise(&mouse_events, cfg.perfect_precision);
    let distance_uniform = moves.len() > 10 && segment_distance_stddev(&moves) < cfg.distance_stddev_px;

    let flags = [straight_line, speed_flag, precision_flag, distance_uniform]
        .iter()
        .filter(|f| **f)
        .count();

    (flags as f64 / (mouse_events.len() as f64 + 1.0)).min(1.0)
}

/// A dominant contiguous segment is "straight" when every intermediate
/// point lies almost exactly on the line from the first to the last point
/// of the segment (curvature near zero).
fn is_straight_line(moves: &[(f64, f64, chrono::DateTime<chrono::Utc>)]) -> bool {
    if moves.len() < 3 {
        return false;
    }
    let (x0, y0, _) = moves[0];
    let (xn, yn, _) = moves[moves.len() - 1];
    let dx = xn - x0;
    let dy = yn - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return false;
    }

    let max_perpendicular_distance = moves
        .iter()
        .map(|(x, y, _)| ((x - x0) * dy - (y - y0) * dx).abs() / len)
        .fold(0.0_f64, f64::max);

    max_perpendicular_distance < 2.0
}

fn exceeds_max_speed(moves: &[(f64, f64, chrono::DateTime<chrono::Utc>)], max_speed_px_s: f64) -> bool {
    moves.windows(2).any(|w| {
        let (x0, y0, t0) = w[0];
        let (x1, y1, t1) = w[1];
        let dt_s = (t1 - t0).num_milliseconds() as f64 / 1000.0;
        if dt_s <= 0.0 {
            return false;
        }
        let dist = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        dist / dt_s > max_speed_px_s
    })
}

fn clicks_too_precise(mouse_events: &[&Event], perfect_precision: f64) -> bool {
    let clicks: Vec<f64> = mouse_events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::MouseClick(c) => Some(c.precision()),
            _ => None,
        })
        .collect();

    if clicks.is_empty() {
        return false;
    }
    let mean = clicks.iter().sum::<f64>() / clicks.len() as f64;
    mean > perfect_precision
}

fn segment_distance_stddev(moves: &[(f64, f64, chrono::DateTime<chrono::Utc>)]) -> f64 {
    let distances: Vec<f64> = moves
        .windows(2)
        .map(|w| ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt())
        .collect();
    if distances.is_empty() {
        return f64::MAX;
    }
    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / distances.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_types::{MouseClickPayload, MouseMovePayload};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn move_at(x: f64, y: f64, offset_ms: i64) -> Event {
        Event {
            session_id: Uuid::nil(),
            timestamp: Utc::now() + Duration::milliseconds(offset_ms),
            payload: EventPayload::MouseMove(MouseMovePayload { x, y }),
            element_id: None,
            element_type: None,
        }
    }

    #[test]
    fn insufficient_events_returns_neutral() {
        let cfg = MouseConfig::default();
        let events = vec![move_at(0.0, 0.0, 0)];
        assert_eq!(score(&events, &cfg), 0.5);
    }

    #[test]
    fn a_perfectly_straight_uniform_path_is_flagged() {
        let cfg = MouseConfig::default();
        let events: Vec<Event> = (0..20).map(|i| move_at(i as f64 * 10.0, 0.0, i * 50)).collect();
        let s = score(&events, &cfg);
        assert!(s > 0.0, "expected straight-line path to raise the score, got {s}");
    }

    #[test]
    fn curved_natural_path_is_not_flagged_as_straight() {
        let cfg = MouseConfig::default();
        let events: Vec<Event> = (0..20)
            .map(|i| {
                let t = i as f64;
                move_at(t * 10.0, (t * 0.3).sin() * 40.0, i * 50)
            })
            .collect();
        assert!(!is_straight_line(
            &events
                .iter()
                .filter_map(|e| match &e.payload {
                    EventPayload::MouseMove(m) => Some((m.x, m.y, e.timestamp)),
                    _ => None,
                })
                .collect::<Vec<_>>()
        ));
    }

    #[test]
    fn click_precision_above_threshold_raises_the_score() {
        let cfg = MouseConfig::default();
        let mut events = vec![move_at(0.0, 0.0, 0), move_at(1.0, 1.0, 10)];
        events.push(Event {
            session_id: Uuid::nil(),
            timestamp: Utc::now(),
            payload: EventPayload::MouseClick(MouseClickPayload {
                x: 50.0,
                y: 50.0,
                target_x_min: Some(49.0),
                target_y_min: Some(49.0),
                target_x_max: Some(51.0),
                target_y_max: Some(51.0),
            }),
            element_id: None,
            element_type: None,
        });
        let s = score(&events, &cfg);
        assert!(s > 0.0);
    }
}
