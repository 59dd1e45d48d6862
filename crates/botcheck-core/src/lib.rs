//! Internal infrastructure shared across the scoring engine: injectable
//! clock/ID generation, the cross-crate `Context` handle, text similarity,
//! and device fingerprinting. Schemas live in `botcheck-types`; this crate
//! holds the small pieces of behavior every other crate needs.

mod clock;
mod context;
mod fingerprint;
mod idgen;
mod similarity;

pub use clock::{Clock, SystemClock};
pub use context::{AggregateStore, Context, Store, TextClassifier};
pub use fingerprint::device_fingerprint;
pub use idgen::{IdGen, RandomIdGen};
pub use similarity::{max_pairwise_similarity, trigram_jaccard};
