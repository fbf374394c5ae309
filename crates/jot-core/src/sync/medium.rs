//! Storage medium availability

use std::sync::atomic::{AtomicBool, Ordering};

/// Mount/permission state of the storage backing the file mirror.
///
/// These predicates reflect platform state the engine cannot control; the
/// engine checks them before every file-touching operation and treats an
/// unavailable medium as a normal skip, not an error.
pub trait StorageMedium: Send + Sync {
    /// Whether the medium can currently be read
    fn is_readable(&self) -> bool;

    /// Whether the medium can currently be written
    fn is_writable(&self) -> bool;
}

/// A medium that is always mounted, e.g. private app storage on desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl StorageMedium for AlwaysAvailable {
    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        true
    }
}

/// Externally updated availability flags.
///
/// The platform shell flips these from mount/permission events. A medium
/// can be readable but not writable (mounted read-only); writable implies
/// readable is the caller's responsibility to maintain.
#[derive(Debug, Default)]
pub struct MediumState {
    readable: AtomicBool,
    writable: AtomicBool,
}

impl MediumState {
    /// Create a state with both flags set
    #[must_use]
    pub fn available() -> Self {
        Self {
            readable: AtomicBool::new(true),
            writable: AtomicBool::new(true),
        }
    }

    /// Update the readable flag
    pub fn set_readable(&self, readable: bool) {
        self.readable.store(readable, Ordering::Relaxed);
    }

    /// Update the writable flag
    pub fn set_writable(&self, writable: bool) {
        self.writable.store(writable, Ordering::Relaxed);
    }
}

impl StorageMedium for MediumState {
    fn is_readable(&self) -> bool {
        self.readable.load(Ordering::Relaxed)
    }

    fn is_writable(&self) -> bool {
        self.writable.load(Ordering::Relaxed)
    }
}
