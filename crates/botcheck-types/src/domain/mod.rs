mod detection;
mod fraud;
mod grid;
mod response;
mod session;
mod survey;
mod text;
mod timing;

pub use detection::{DetectionResult, RiskLevel};
pub use fraud::{FraudIndicator, FraudReason};
pub use grid::GridResponseRow;
pub use response::{FlagReason, SurveyResponse};
pub use session::{Session, SessionStatus};
pub use survey::{QuestionType, SurveyQuestion};
pub use text::TextClassification;
pub use timing::TimingAnalysis;
