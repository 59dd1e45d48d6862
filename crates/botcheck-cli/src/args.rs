use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "botcheck")]
#[command(about = "Ingest survey telemetry, score sessions, and print hierarchy summaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the sqlite store file. Defaults to `~/.botcheck/store.db3`.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to a `Config` TOML file. Defaults to `Config::default_path()`
    /// (`BOTCHECK_CONFIG` env var, then the XDG config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of a text-classification service implementing the
    /// `/classify` contract. Without it, responses are scored by a
    /// length/repetition heuristic.
    #[arg(long, global = true)]
    pub classifier_url: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a new session for a survey/platform/respondent")]
    CreateSession {
        #[arg(long)]
        survey_id: String,
        #[arg(long)]
        platform_id: String,
        #[arg(long)]
        respondent_id: String,
        #[arg(long)]
        user_agent: Option<String>,
        #[arg(long)]
        ip_address: Option<String>,
    },

    #[command(about = "Append a batch of events (JSON array) to a session")]
    Ingest {
        session_id: Uuid,
        /// Path to a JSON file containing an array of `Event` objects.
        events_file: PathBuf,
    },

    #[command(about = "Run the full scoring pipeline for a session and persist the result")]
    Score { session_id: Uuid },

    #[command(about = "Print a rolled-up summary for a survey, platform, or respondent")]
    Summary {
        survey_id: String,
        #[arg(long)]
        platform_id: Option<String>,
        #[arg(long)]
        respondent_id: Option<String>,
        #[arg(long)]
        date_from: Option<chrono::DateTime<chrono::Utc>>,
        #[arg(long)]
        date_to: Option<chrono::DateTime<chrono::Utc>>,
    },

    #[command(about = "Print a session's stored detection result and fraud indicator, if any")]
    Detail { session_id: Uuid },
}
