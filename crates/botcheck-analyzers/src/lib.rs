//! Pure analyzers for the bot-detection scoring engine (§4.2, §4.5, §4.6).
//!
//! Every function here is `(data, config) -> score`, with no I/O and no
//! dependency on the store or the classifier — those seams live in
//! `botcheck-scoring` and `botcheck-providers`.

pub mod behavioral;
pub mod grid;
pub mod timing_response;

pub use behavioral::{analyze as analyze_behavioral, BehavioralScores};
pub use grid::{analyze as analyze_grid, GridAnalysis, GridPattern};
pub use timing_response::{analyze as analyze_response_timing, is_anomalous};
