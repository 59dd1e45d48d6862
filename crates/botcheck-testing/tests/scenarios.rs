//! The six end-to-end scenarios enumerated in §8: clean human, robotic
//! typist, full composite bot, straight-lining respondent, duplicate
//! response, and classifier outage.

use botcheck_providers::StubClassifier;
use botcheck_testing::assertions::{assert_classified_as_human, assert_risk_at_least, assert_text_quality_unavailable};
use botcheck_testing::fixtures::*;
use botcheck_testing::world::epoch;
use botcheck_testing::TestWorld;
use botcheck_types::RiskLevel;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn clean_human_scores_low_risk_with_no_text_or_fraud() {
    let world = TestWorld::new(Arc::new(StubClassifier::heuristic()));
    let session = world.create_session("survey-1", "panel-a", "respondent-1");
    let start = epoch();

    let mut events = human_keystrokes(session.id, start);
    events.extend(human_mouse_path(session.id, start, 50));
    events.push(device_info_event(session.id, start, 1680, 1050));
    world.append_events(session.id, events);

    let detection = world.client.score_session(session.id).await.unwrap();
    assert_classified_as_human(&detection);
    assert_eq!(detection.risk_level, RiskLevel::Low);
    assert_eq!(detection.composite_score, None, "Case D: behavioral-only, no text or fraud signal at all");
    assert_text_quality_unavailable(&detection);
    assert_eq!(detection.fraud_score, None);
}

#[tokio::test]
async fn robotic_typist_does_not_spuriously_flip_behavioral_only() {
    let world = TestWorld::new(Arc::new(StubClassifier::heuristic()));
    let session = world.create_session("survey-1", "panel-a", "respondent-2");
    let start = epoch();

    let events = robotic_keystrokes(session.id, start, 40, 100);
    world.append_events(session.id, events);

    let detection = world.client.score_session(session.id).await.unwrap();
    assert_classified_as_human(&detection);
    assert_eq!(detection.risk_level, RiskLevel::Medium);
    assert_eq!(detection.composite_score, None, "Case D: still behavioral-only with no text or fraud");
}

#[tokio::test]
async fn full_composite_bot_blends_behavioral_text_and_fraud_without_flipping() {
    let classifier = StubClassifier::heuristic();
    let question_text = "Describe your experience with our product.";
    let response_text = "asdkjh aslkjdh qwoeiru zxcvb";
    classifier.script(question_text, response_text, gibberish_classification()).await;
    let world = TestWorld::new(Arc::new(classifier));

    // 12 prior sessions sharing the same IP address, to drive ip_score to 0.80.
    for i in 0..12 {
        world.create_session("survey-bot", "panel-a", &format!("noise-{i}"));
    }

    let session = world.create_session("survey-bot", "panel-a", "respondent-3");
    let start = epoch();
    world.append_events(session.id, robotic_keystrokes(session.id, start, 40, 100));

    let question_id = Uuid::new_v4();
    world.client.submit_question(&open_ended_question(question_id, session.id, question_text, start)).unwrap();
    world.client.submit_response(&response(Uuid::new_v4(), session.id, question_id, response_text, 8_000)).unwrap();

    let detection = world.client.score_session(session.id).await.unwrap();
    assert_classified_as_human(&detection);
    assert_eq!(detection.risk_level, RiskLevel::Medium);
    assert!(detection.composite_score.is_some(), "Case A: all three components available");
    assert!(detection.text_quality_score.unwrap() > 0.80, "gibberish response should drive text risk high");
    assert!(detection.fraud_score.unwrap() > 0.0, "12 prior sessions on the same IP should raise fraud above zero");
}

#[tokio::test]
async fn straight_lining_respondent_is_flagged_in_the_grid_summary() {
    let world = TestWorld::new(Arc::new(StubClassifier::heuristic()));
    let session = world.create_session("survey-grid", "panel-a", "respondent-4");
    let start = epoch();

    let question_id = Uuid::new_v4();
    world.client.submit_question(&grid_question(question_id, session.id, "Rate each statement", start)).unwrap();

    let row_ids = ["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10"];
    let mut rows = straight_lined_grid_rows(session.id, question_id, &row_ids[..9], "4");
    rows.extend(varied_grid_rows(session.id, question_id, &row_ids[9..], &["1"]));
    world.client.submit_grid_rows(&rows).unwrap();

    let summary = world.client.reader().summary("survey-grid", None, None, None, None, &world.client.config().grid).unwrap();
    assert_eq!(summary.grid.total_analyzed, 1);
    assert_eq!(summary.grid.straight_lined_count, 1);
}

#[tokio::test]
async fn duplicate_response_is_flagged_but_not_enough_alone_to_mark_is_duplicate() {
    let world = TestWorld::new(Arc::new(StubClassifier::heuristic()));
    let question_id = Uuid::new_v4();
    let response_text = "I really enjoyed using this product every single day of the week";

    let session_a = world.create_session("survey-dup", "panel-a", "respondent-5");
    world.client.submit_question(&open_ended_question(question_id, session_a.id, "What did you think?", epoch())).unwrap();
    world.client.submit_response(&response(Uuid::new_v4(), session_a.id, question_id, response_text, 6_000)).unwrap();

    let session_b = world.create_session("survey-dup", "panel-a", "respondent-6");
    world.client.submit_question(&open_ended_question(question_id, session_b.id, "What did you think?", epoch())).unwrap();
    world.client.submit_response(&response(Uuid::new_v4(), session_b.id, question_id, response_text, 6_500)).unwrap();

    let detection = world.client.score_session(session_b.id).await.unwrap();
    let (_, _, fraud) = world.client.reader().detail(session_b.id).unwrap();
    let fraud = fraud.expect("fraud indicator should have been persisted");
    assert_flagged_duplicate_weight(&fraud);
    assert!(!fraud.is_duplicate, "duplicate text alone should not cross the 0.70 is_duplicate cutoff");
    assert!(!detection.is_bot);
}

fn assert_flagged_duplicate_weight(fraud: &botcheck_types::FraudIndicator) {
    assert_eq!(fraud.duplicate_score, 1.00);
    assert!(fraud.flag_reasons.contains_key(&botcheck_types::FraudReason::DuplicateResponses));
}

#[tokio::test]
async fn classifier_outage_falls_back_to_behavioral_and_fraud() {
    let world = TestWorld::new(Arc::new(StubClassifier::always_unavailable("LLM provider unreachable")));
    let session = world.create_session("survey-outage", "panel-a", "respondent-7");
    let start = epoch();
    world.append_events(session.id, robotic_keystrokes(session.id, start, 40, 100));

    for i in 0..5 {
        let question_id = Uuid::new_v4();
        world.client.submit_question(&open_ended_question(question_id, session.id, "Tell us more", start)).unwrap();
        world
            .client
            .submit_response(&response(Uuid::new_v4(), session.id, question_id, "a perfectly reasonable answer here", 4_000 + i * 100))
            .unwrap();
    }

    let detection = world.client.score_session(session.id).await.unwrap();
    assert_text_quality_unavailable(&detection);
    assert_risk_at_least(&detection, RiskLevel::Low);
}
