use std::sync::atomic::{AtomicBool, Ordering};

pub type VesselId = u64;

// ---------------------------------------------------------------------------
// Vessel: the controlled rigid body
// ---------------------------------------------------------------------------

/// Host-owned rigid body. Flags are atomics because the host flips them
/// from its own thread while control ticks may be running.
#[derive(Debug)]
pub struct Vessel {
    id: VesselId,
    name: String,
    has_physics: bool,
    is_static: AtomicBool,
    marked_for_removal: AtomicBool,
}

impl Vessel {
    pub fn new(id: VesselId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            has_physics: true,
            is_static: AtomicBool::new(false),
            marked_for_removal: AtomicBool::new(false),
        }
    }

    /// A body with no physics representation (never controlled).
    pub fn without_physics(id: VesselId, name: impl Into<String>) -> Self {
        Self { has_physics: false, ..Self::new(id, name) }
    }

    pub fn id(&self) -> VesselId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_physics(&self) -> bool {
        self.has_physics
    }

    pub fn is_static(&self) -> bool {
        self.is_static.load(Ordering::Acquire)
    }

    pub fn set_static(&self, value: bool) {
        self.is_static.store(value, Ordering::Release);
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal.load(Ordering::Acquire)
    }

    pub fn mark_for_removal(&self) {
        self.marked_for_removal.store(true, Ordering::Release);
    }
}
