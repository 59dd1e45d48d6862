/// Structured result from the `TextClassifier` collaborator (§6.2): four
/// probabilities in `[0, 1]` plus a 0-100 quality score, returned in one
/// call per response.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextClassification {
    pub p_gibberish: f64,
    pub p_copy_paste: f64,
    pub p_irrelevant: f64,
    pub p_generic: f64,
    pub quality: f64,
}

impl TextClassification {
    /// Arithmetic mean of the four probabilities (§4.3 per-response confidence).
    pub fn mean_probability(&self) -> f64 {
        (self.p_gibberish + self.p_copy_paste + self.p_irrelevant + self.p_generic) / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_probability_averages_the_four_signals() {
        let c = TextClassification {
            p_gibberish: 0.0,
            p_copy_paste: 0.4,
            p_irrelevant: 0.4,
            p_generic: 0.0,
            quality: 80.0,
        };
        assert_eq!(c.mean_probability(), 0.2);
    }
}
