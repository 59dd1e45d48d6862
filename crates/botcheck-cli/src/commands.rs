use crate::args::{Cli, Commands, OutputFormat};
use botcheck_config::Config;
use botcheck_core::TextClassifier;
use botcheck_providers::{CachedClassifier, ClientConfig, HttpTextClassifier, StubClassifier};
use botcheck_sdk::Client;
use botcheck_store::Database;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Arc::new(Database::open(&db_path)?);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = Arc::new(config);

    let classifier: Arc<dyn TextClassifier> = match &cli.classifier_url {
        Some(url) => {
            let http = Arc::new(HttpTextClassifier::new(
                ClientConfig::new(url.clone())
                    .with_timeout_ms(config.text_classifier_timeout_ms)
                    .with_retries(config.text_classifier_retries),
            ));
            Arc::new(CachedClassifier::new(http, config.text_cache_capacity, config.text_cache_ttl_s, config.text_classifier_queue_capacity))
        }
        None => Arc::new(StubClassifier::heuristic()),
    };

    let client = Client::new(db, config, classifier);
    let format = cli.format;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    match cli.command {
        Commands::CreateSession { survey_id, platform_id, respondent_id, user_agent, ip_address } => {
            let session = client.create_session(&survey_id, &platform_id, &respondent_id, user_agent, ip_address)?;
            print_value(format, &session, |s| format!("session {} created for survey={} platform={} respondent={}", s.id, s.survey_id, s.platform_id, s.respondent_id))
        }

        Commands::Ingest { session_id, events_file } => {
            let raw = std::fs::read_to_string(&events_file)?;
            let events: Vec<botcheck_types::Event> = serde_json::from_str(&raw)?;
            let (accepted, total) = client.append_events(session_id, events)?;
            print_value(format, &(accepted, total), |(accepted, total)| format!("accepted {accepted} of this batch, {total} events now stored for session {session_id}"))
        }

        Commands::Score { session_id } => {
            let detection = runtime.block_on(client.score_session(session_id))?;
            print_value(format, &detection, |d| d.summary.clone())
        }

        Commands::Summary { survey_id, platform_id, respondent_id, date_from, date_to } => {
            let summary = client.reader().summary(
                &survey_id,
                platform_id.as_deref(),
                respondent_id.as_deref(),
                date_from,
                date_to,
                &client.config().grid,
            )?;
            print_value(format, &summary, |s| {
                format!(
                    "{} sessions, {} bot ({:.1}%), {} flagged responses ({:.1}%)",
                    s.total_sessions,
                    s.bot_detection.bot_count,
                    s.bot_detection.bot_rate,
                    s.text_quality.flagged_count,
                    s.text_quality.flagged_percentage,
                )
            })
        }

        Commands::Detail { session_id } => {
            let (session, detection, fraud) = client.reader().detail(session_id)?;
            print_value(format, &(session, detection, fraud), |(session, detection, fraud)| {
                let detection = detection.as_ref().map(|d| d.summary.clone()).unwrap_or_else(|| "not yet scored".to_string());
                let fraud = fraud.as_ref().map(|f| format!("{:.2}", f.overall_fraud_score)).unwrap_or_else(|| "n/a".to_string());
                format!("session {}: {detection}, fraud_score={fraud}", session.id)
            })
        }
    }
}

fn print_value<T: Serialize>(format: OutputFormat, value: &T, plain: impl FnOnce(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Plain => println!("{}", plain(value)),
    }
    Ok(())
}

fn default_db_path() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("botcheck").join("store.db3");
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".botcheck").join("store.db3");
    }
    PathBuf::from("botcheck-store.db3")
}
