//! Testing infrastructure for botcheck integration tests.
//!
//! - `TestWorld`: fluent setup wiring a `Client` to an in-memory store and
//!   a deterministic clock/IdGen
//! - `fixtures`: event/question/response/grid-row builders for the §8
//!   scenarios
//! - `assertions`: custom assertions over `DetectionResult`/`FraudIndicator`
//! - `providers`: scripted `TextClassifier` setup

pub mod assertions;
mod clock;
pub mod fixtures;
mod idgen;
pub mod providers;
pub mod world;

pub use clock::SteppedClock;
pub use idgen::SequentialIdGen;
pub use world::TestWorld;
