use uuid::Uuid;

/// Injectable UUID generator (§4.9). Tests substitute a deterministic
/// sequence so fixtures are reproducible.
pub trait IdGen: Send + Sync {
    fn new_id(&self) -> Uuid;
}

/// Random v4 UUIDs, used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGen;

impl IdGen for RandomIdGen {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
