//! `TextClassifier` collaborator implementations (§6.2): an HTTP-backed
//! client, a content-hash cache with single-flight coalescing in front of
//! a bounded work queue for backpressure (composed by `CachedClassifier`),
//! and a deterministic stub for tests.

mod cache;
mod cached;
mod client;
mod error;
mod queue;
mod stub;

pub use cache::{CacheKey, ClassificationCache};
pub use cached::CachedClassifier;
pub use client::{ClientConfig, HttpTextClassifier};
pub use error::{Error, Result};
pub use queue::ClassifierQueue;
pub use stub::StubClassifier;
