use botcheck_types::Event;

/// §4.2.5: always neutral, no request metadata is available at this layer.
pub fn score(_events: &[Event]) -> f64 {
    0.5
}
