/// Tri-state analyzer output (§9 design note: "optional analyzer outputs").
///
/// Replaces the sentinel-float pattern ("0.5 means neutral", "-1.0 means
/// unavailable") with an explicit variant the `CompositeScorer` can match on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<T> {
    /// A computed score.
    Value(T),
    /// Insufficient data to compute a score; contributes the method's
    /// documented neutral value instead of being dropped.
    Neutral,
    /// The analyzer could not run (classifier failure, missing history).
    /// Excluded from any weighted sum; the weight is redistributed.
    Unavailable,
}

impl<T: Copy> Outcome<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(*v),
            Outcome::Neutral | Outcome::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Outcome::Value(_) | Outcome::Neutral)
    }
}

impl Outcome<f64> {
    /// Score to use in a weighted sum: neutral floats to its own value,
    /// unavailable is handled by the caller via `is_available`.
    pub fn or_neutral(&self, neutral: f64) -> f64 {
        match self {
            Outcome::Value(v) => *v,
            Outcome::Neutral => neutral,
            Outcome::Unavailable => neutral,
        }
    }
}
