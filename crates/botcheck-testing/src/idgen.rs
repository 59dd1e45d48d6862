use botcheck_core::IdGen;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Deterministic `IdGen` that hands out sequential UUIDs, so fixtures can
/// assert against a known session/event ID instead of a random one.
pub struct SequentialIdGen {
    next: AtomicU64,
}

impl SequentialIdGen {
    pub fn starting_at(seed: u64) -> Self {
        Self { next: AtomicU64::new(seed) }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGen for SequentialIdGen {
    fn new_id(&self) -> Uuid {
        let value = self.next.fetch_add(1, Ordering::SeqCst);
        Uuid::from_u128(value as u128)
    }
}
