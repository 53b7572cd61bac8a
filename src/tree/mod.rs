//! Directory tree scanning
//!
//! Two modes share one traversal core:
//!
//! - `TreeWalker`: synchronous, builds the full filtered tree in memory
//! - `BackgroundScanner`: cancellable, reports each directory's children as
//!   events with percentage progress

mod background;
mod cancel;
mod config;
mod events;
mod node;
mod traversal;
mod walker;

pub use background::{BackgroundScanner, PROGRESS_INTERVAL, ScanHandle, ScanOutcome};
pub use cancel::CancellationToken;
pub use config::ScanOptions;
pub use events::{ScanEntry, ScanEvent, ScanPhase, ScanProgress};
pub use node::{ACCESS_DENIED_LABEL, TreeNode};
pub use traversal::{Entry, Traversal, root_name};
pub use walker::TreeWalker;
