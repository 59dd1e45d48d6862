use crate::scope::{DateRange, Scope};
use crate::summary::{
    percentage, BotDetectionSummary, EventsSummary, FraudSummary, GridSummary, HierarchySummary, TextQualitySummary, TimingSummary,
};
use crate::Result;
use botcheck_analyzers::analyze_grid;
use botcheck_config::GridConfig;
use botcheck_core::AggregateStore;
use botcheck_types::{DetectionResult, FraudIndicator, GridResponseRow, RiskLevel, Session, SurveyResponse, TimingAnalysis};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

/// Rolls up every facet for one hierarchy `scope` into a single
/// `HierarchySummary`. Every read goes through `AggregateStore`'s
/// hierarchy-scoped queries — no per-session fan-out (§4.8 invariant).
pub fn summarize(store: &dyn AggregateStore, scope: &Scope, range: DateRange, grid_cfg: &GridConfig) -> Result<HierarchySummary> {
    let sessions = store.sessions_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;
    let detections = store.detections_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id(), range.from, range.to)?;
    let fraud_indicators = store.fraud_indicators_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;
    let responses = store.responses_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;
    let grid_rows = store.grid_rows_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;
    let timing_analyses = store.timing_analyses_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;
    let event_total = store.event_count_in_hierarchy(&scope.survey_id, scope.platform_id(), scope.respondent_id())?;

    let (total_platforms, platform_distribution) = platform_distribution(&sessions);
    let total_respondents = sessions.iter().map(|s| s.respondent_id.as_str()).collect::<BTreeSet<_>>().len();

    Ok(HierarchySummary {
        survey_id: scope.survey_id.clone(),
        platform_id: scope.platform_id.clone(),
        respondent_id: scope.respondent_id.clone(),
        total_sessions: sessions.len(),
        total_respondents,
        total_platforms,
        platform_distribution,
        bot_detection: bot_detection_summary(&detections),
        risk_distribution: risk_distribution(&detections),
        events: events_summary(event_total, sessions.len()),
        text_quality: text_quality_summary(&responses),
        fraud: fraud_summary(&fraud_indicators),
        grid: grid_summary(&grid_rows, grid_cfg),
        timing: timing_summary(&timing_analyses),
        date_range: range.into(),
    })
}

fn platform_distribution(sessions: &[Session]) -> (usize, BTreeMap<String, usize>) {
    let mut dist: BTreeMap<String, usize> = BTreeMap::new();
    for session in sessions {
        *dist.entry(session.platform_id.clone()).or_insert(0) += 1;
    }
    (dist.len(), dist)
}

fn bot_detection_summary(detections: &[DetectionResult]) -> BotDetectionSummary {
    let total = detections.len();
    let bot_count = detections.iter().filter(|d| d.is_bot).count();
    let avg_confidence = if total == 0 {
        0.0
    } else {
        detections.iter().map(|d| d.confidence_score).sum::<f64>() / total as f64
    };
    BotDetectionSummary {
        total_detections: total,
        bot_count,
        human_count: total - bot_count,
        bot_rate: percentage(bot_count, total),
        avg_confidence,
    }
}

fn risk_distribution(detections: &[DetectionResult]) -> BTreeMap<RiskLevel, usize> {
    let mut dist: BTreeMap<RiskLevel, usize> = BTreeMap::new();
    for detection in detections {
        *dist.entry(detection.risk_level).or_insert(0) += 1;
    }
    dist
}

fn events_summary(total: usize, session_count: usize) -> EventsSummary {
    let avg_per_session = if session_count == 0 { 0.0 } else { total as f64 / session_count as f64 };
    EventsSummary { total, avg_per_session }
}

fn text_quality_summary(responses: &[SurveyResponse]) -> TextQualitySummary {
    let scored: Vec<f64> = responses.iter().filter_map(|r| r.quality_score).collect();
    let flagged_count = responses.iter().filter(|r| r.is_flagged).count();
    let avg_quality_score = if scored.is_empty() { 0.0 } else { scored.iter().sum::<f64>() / scored.len() as f64 };
    TextQualitySummary {
        total_responses: responses.len(),
        avg_quality_score,
        flagged_count,
        flagged_percentage: percentage(flagged_count, responses.len()),
    }
}

fn fraud_summary(indicators: &[FraudIndicator]) -> FraudSummary {
    let total = indicators.len();
    let duplicate_count = indicators.iter().filter(|i| i.is_duplicate).count();
    let avg_fraud_score = if total == 0 {
        0.0
    } else {
        indicators.iter().map(|i| i.overall_fraud_score).sum::<f64>() / total as f64
    };
    let mut reason_distribution = BTreeMap::new();
    for indicator in indicators {
        for reason in indicator.flag_reasons.keys() {
            *reason_distribution.entry(*reason).or_insert(0) += 1;
        }
    }
    FraudSummary {
        total_indicators: total,
        duplicate_count,
        duplicate_percentage: percentage(duplicate_count, total),
        avg_fraud_score,
        reason_distribution,
    }
}

/// Groups raw rows by `(session_id, question_id)` and re-runs the pure grid
/// analyzer per group — only raw rows are persisted, not derived
/// `GridAnalysis` results, so the summary recomputes them from the
/// already-scoped slice rather than issuing further store reads.
fn grid_summary(rows: &[GridResponseRow], cfg: &GridConfig) -> GridSummary {
    let mut groups: HashMap<(Uuid, Uuid), Vec<GridResponseRow>> = HashMap::new();
    for row in rows {
        groups.entry((row.session_id, row.question_id)).or_default().push(row.clone());
    }

    let mut total_analyzed = 0;
    let mut straight_lined_count = 0;
    let mut pattern_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut variance_sum = 0.0;

    for group in groups.values_mut() {
        group.sort_by(|a, b| a.row_id.cmp(&b.row_id));
        let Some(analysis) = analyze_grid(group, cfg) else { continue };
        total_analyzed += 1;
        if analysis.straight_lined {
            straight_lined_count += 1;
        }
        if let Some(pattern) = analysis.pattern {
            *pattern_distribution.entry(format!("{pattern:?}")).or_insert(0) += 1;
        }
        variance_sum += analysis.variance_score;
    }

    GridSummary {
        total_analyzed,
        straight_lined_count,
        straight_lined_percentage: percentage(straight_lined_count, total_analyzed),
        pattern_distribution,
        avg_variance_score: if total_analyzed == 0 { 0.0 } else { variance_sum / total_analyzed as f64 },
    }
}

fn timing_summary(analyses: &[TimingAnalysis]) -> TimingSummary {
    let total = analyses.len();
    let speeder_count = analyses.iter().filter(|a| a.is_speeder).count();
    let flatliner_count = analyses.iter().filter(|a| a.is_flatliner).count();
    let anomaly_count = analyses.iter().filter(|a| a.is_anomaly(2.5)).count();
    TimingSummary {
        total_analyses: total,
        speeder_count,
        speeder_percentage: percentage(speeder_count, total),
        flatliner_count,
        flatliner_percentage: percentage(flatliner_count, total),
        anomaly_count,
        anomaly_percentage: percentage(anomaly_count, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_types::{FlagReason, FraudReason, RiskLevel, SessionStatus};
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        sessions: Vec<Session>,
        detections: Vec<DetectionResult>,
        fraud: Vec<FraudIndicator>,
        responses: Vec<SurveyResponse>,
        grid_rows: Vec<GridResponseRow>,
        timing: Vec<TimingAnalysis>,
        events: usize,
    }

    impl AggregateStore for Mutex<FakeStore> {
        fn sessions_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<Vec<Session>> {
            Ok(self.lock().unwrap().sessions.clone())
        }
        fn detections_in_hierarchy(
            &self,
            _s: &str,
            _p: Option<&str>,
            _r: Option<&str>,
            _since: Option<chrono::DateTime<Utc>>,
            _until: Option<chrono::DateTime<Utc>>,
        ) -> botcheck_types::Result<Vec<DetectionResult>> {
            Ok(self.lock().unwrap().detections.clone())
        }
        fn fraud_indicators_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<Vec<FraudIndicator>> {
            Ok(self.lock().unwrap().fraud.clone())
        }
        fn responses_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<Vec<SurveyResponse>> {
            Ok(self.lock().unwrap().responses.clone())
        }
        fn grid_rows_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<Vec<GridResponseRow>> {
            Ok(self.lock().unwrap().grid_rows.clone())
        }
        fn timing_analyses_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<Vec<TimingAnalysis>> {
            Ok(self.lock().unwrap().timing.clone())
        }
        fn event_count_in_hierarchy(&self, _s: &str, _p: Option<&str>, _r: Option<&str>) -> botcheck_types::Result<usize> {
            Ok(self.lock().unwrap().events)
        }
    }

    fn session(platform: &str, respondent: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            survey_id: "s1".into(),
            platform_id: platform.into(),
            respondent_id: respondent.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            status: SessionStatus::Completed,
            user_agent: None,
            ip_address: None,
            device_fingerprint: None,
        }
    }

    #[test]
    fn empty_hierarchy_yields_zeroed_aggregates_not_errors() {
        let store = Mutex::new(FakeStore::default());
        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.bot_detection.total_detections, 0);
        assert_eq!(summary.bot_detection.bot_rate, 0.0);
        assert_eq!(summary.text_quality.avg_quality_score, 0.0);
    }

    #[test]
    fn survey_summary_rolls_up_platform_distribution_and_bot_rate() {
        let mut fake = FakeStore::default();
        fake.sessions = vec![session("web", "r1"), session("web", "r2"), session("mobile", "r3")];
        fake.detections = vec![
            DetectionResult {
                session_id: Uuid::new_v4(),
                created_at: Utc::now(),
                is_bot: true,
                confidence_score: 0.9,
                risk_level: RiskLevel::Critical,
                method_scores: BTreeMap::new(),
                processing_time_ms: 5,
                event_count: 10,
                composite_score: Some(0.9),
                text_quality_score: None,
                fraud_score: None,
                summary: "bot".into(),
            },
            DetectionResult {
                session_id: Uuid::new_v4(),
                created_at: Utc::now(),
                is_bot: false,
                confidence_score: 0.2,
                risk_level: RiskLevel::Low,
                method_scores: BTreeMap::new(),
                processing_time_ms: 5,
                event_count: 10,
                composite_score: Some(0.2),
                text_quality_score: None,
                fraud_score: None,
                summary: "human".into(),
            },
        ];
        fake.events = 40;
        let store = Mutex::new(fake);

        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.total_respondents, 3);
        assert_eq!(summary.total_platforms, 2);
        assert_eq!(summary.platform_distribution.get("web"), Some(&2));
        assert_eq!(summary.bot_detection.bot_count, 1);
        assert_eq!(summary.bot_detection.bot_rate, 50.0);
        assert_eq!(summary.events.avg_per_session, 40.0 / 3.0);
    }

    #[test]
    fn fraud_summary_counts_duplicates_and_reason_distribution() {
        let mut fake = FakeStore::default();
        let mut reasons = BTreeMap::new();
        reasons.insert(FraudReason::IpReuse, 0.8);
        fake.fraud = vec![FraudIndicator {
            session_id: Uuid::new_v4(),
            survey_id: "s1".into(),
            platform_id: "web".into(),
            respondent_id: "r1".into(),
            overall_fraud_score: 0.8,
            is_duplicate: true,
            ip_score: 0.8,
            device_score: 0.0,
            duplicate_score: 0.0,
            geo_score: 0.0,
            velocity_score: 0.0,
            flag_reasons: reasons,
        }];
        let store = Mutex::new(fake);

        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.fraud.total_indicators, 1);
        assert_eq!(summary.fraud.duplicate_count, 1);
        assert_eq!(summary.fraud.duplicate_percentage, 100.0);
        assert_eq!(summary.fraud.reason_distribution.get(&FraudReason::IpReuse), Some(&1));
    }

    #[test]
    fn text_quality_summary_averages_only_scored_responses() {
        let mut fake = FakeStore::default();
        let mut flagged = SurveyResponse::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "short".into(), 500);
        flagged.quality_score = Some(20.0);
        flagged.is_flagged = true;
        flagged.flag_reasons.insert(FlagReason::LowQuality);
        let unscored = SurveyResponse::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "tiny".into(), 500);
        fake.responses = vec![flagged, unscored];
        let store = Mutex::new(fake);

        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.text_quality.total_responses, 2);
        assert_eq!(summary.text_quality.avg_quality_score, 20.0);
        assert_eq!(summary.text_quality.flagged_count, 1);
        assert_eq!(summary.text_quality.flagged_percentage, 50.0);
    }

    #[test]
    fn grid_summary_groups_rows_by_session_and_question_before_analyzing() {
        let mut fake = FakeStore::default();
        let (sid, qid) = (Uuid::new_v4(), Uuid::new_v4());
        fake.grid_rows = vec![
            GridResponseRow { session_id: sid, question_id: qid, row_id: "r1".into(), value: "3".into(), response_time_ms: None },
            GridResponseRow { session_id: sid, question_id: qid, row_id: "r2".into(), value: "3".into(), response_time_ms: None },
        ];
        let store = Mutex::new(fake);

        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.grid.total_analyzed, 1);
        assert_eq!(summary.grid.straight_lined_count, 1);
    }

    #[test]
    fn timing_summary_counts_speeders_flatliners_and_anomalies() {
        let mut fake = FakeStore::default();
        fake.timing = vec![
            TimingAnalysis { session_id: Uuid::new_v4(), question_id: Uuid::new_v4(), response_time_ms: 500, is_speeder: true, is_flatliner: false, anomaly_z: None },
            TimingAnalysis { session_id: Uuid::new_v4(), question_id: Uuid::new_v4(), response_time_ms: 400_000, is_speeder: false, is_flatliner: true, anomaly_z: Some(3.0) },
        ];
        let store = Mutex::new(fake);

        let summary = summarize(&store, &Scope::survey("s1"), DateRange::default(), &GridConfig::default()).unwrap();
        assert_eq!(summary.timing.total_analyses, 2);
        assert_eq!(summary.timing.speeder_count, 1);
        assert_eq!(summary.timing.flatliner_count, 1);
        assert_eq!(summary.timing.anomaly_count, 1);
    }
}
