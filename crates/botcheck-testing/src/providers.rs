//! Scripted `TextClassifier` setup for the §8 scenarios that depend on
//! text quality (full composite bot) or its absence (classifier outage).

use botcheck_providers::StubClassifier;
use botcheck_types::TextClassification;

/// A `TextClassification` confidently flagging gibberish, for the full
/// composite bot scenario.
pub fn gibberish_classification() -> TextClassification {
    TextClassification { p_gibberish: 0.95, p_copy_paste: 0.0, p_irrelevant: 0.0, p_generic: 0.0, quality: 5.0 }
}

/// A `TextClassification` for a clean, on-topic, high-quality answer.
pub fn clean_classification() -> TextClassification {
    TextClassification { p_gibberish: 0.0, p_copy_paste: 0.0, p_irrelevant: 0.0, p_generic: 0.0, quality: 90.0 }
}

/// Scripts `question_text`/`response_text` to classify as gibberish.
pub async fn classifier_scripted_gibberish(question_text: &str, response_text: &str) -> StubClassifier {
    let stub = StubClassifier::heuristic();
    stub.script(question_text, response_text, gibberish_classification()).await;
    stub
}

/// A stub that models the classifier being unreachable, for the
/// classifier-outage scenario: `CompositeScorer` must fall back to
/// behavioral+fraud (§4.7 Case B) rather than failing the whole pipeline.
pub fn classifier_outage(reason: &str) -> StubClassifier {
    StubClassifier::always_unavailable(reason.to_string())
}
