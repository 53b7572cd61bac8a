//! Cooperative cancellation for background scans

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared flag polled by a running scan.
///
/// Cancelling never interrupts a filesystem call in progress; the scan stops
/// the next time it checks the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
