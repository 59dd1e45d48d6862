use async_trait::async_trait;
use botcheck_core::TextClassifier;
use botcheck_types::{Result, TextClassification};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Deterministic `TextClassifier` double for tests and the classifier-outage
/// end-to-end scenario (§8). Scripted by exact `(question_text, response_text)`
/// pair, with a fallback heuristic for anything unscripted.
pub struct StubClassifier {
    scripted: Mutex<HashMap<(String, String), Outcome>>,
    default_outcome: Outcome,
}

#[derive(Clone)]
enum Outcome {
    Classification(TextClassification),
    Unavailable(String),
}

impl StubClassifier {
    /// Falls back to a length/repetition heuristic for any pair that wasn't
    /// explicitly scripted via [`Self::script`].
    pub fn heuristic() -> Self {
        Self {
            scripted: Mutex::new(HashMap::new()),
            default_outcome: Outcome::Classification(TextClassification {
                p_gibberish: 0.0,
                p_copy_paste: 0.0,
                p_irrelevant: 0.0,
                p_generic: 0.0,
                quality: 80.0,
            }),
        }
    }

    /// Always returns `ClassifierUnavailable`, for the outage scenario.
    pub fn always_unavailable(reason: impl Into<String>) -> Self {
        Self {
            scripted: Mutex::new(HashMap::new()),
            default_outcome: Outcome::Unavailable(reason.into()),
        }
    }

    pub async fn script(&self, question_text: impl Into<String>, response_text: impl Into<String>, classification: TextClassification) {
        let mut scripted = self.scripted.lock().await;
        scripted.insert((question_text.into(), response_text.into()), Outcome::Classification(classification));
    }
}

#[async_trait]
impl TextClassifier for StubClassifier {
    async fn classify(&self, question_text: &str, response_text: &str) -> Result<TextClassification> {
        let scripted = self.scripted.lock().await;
        let key = (question_text.to_string(), response_text.to_string());
        match scripted.get(&key).cloned().unwrap_or_else(|| self.default_outcome.clone()) {
            Outcome::Classification(c) => Ok(c),
            Outcome::Unavailable(reason) => Err(botcheck_types::Error::ClassifierUnavailable(reason)),
        }
    }
}
