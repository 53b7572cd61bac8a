//! BackgroundScanner - cancellable, incremental enumeration
//!
//! A scan runs in two phases. The counting phase walks the filtered structure
//! to size the progress denominator, counting sibling subtrees in parallel.
//! The scanning phase walks it again and reports each directory's visible
//! children before descending into them.

use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, unbounded};
use rayon::prelude::*;

use crate::filter::FilterConfig;

use super::cancel::CancellationToken;
use super::config::ScanOptions;
use super::events::{ScanEntry, ScanEvent, ScanPhase, ScanProgress};
use super::traversal::{Entry, Traversal, root_name};

/// Progress is re-evaluated every this many scanned files, and once per directory.
pub const PROGRESS_INTERVAL: usize = 10;

/// How a background scan ended. Mirrors the terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

impl ScanOutcome {
    /// Status label of the finished scan.
    pub fn phase(&self) -> ScanPhase {
        match self {
            ScanOutcome::Completed => ScanPhase::Completed,
            ScanOutcome::Cancelled => ScanPhase::Cancelled,
            ScanOutcome::Failed(message) => ScanPhase::Failed(message.clone()),
        }
    }
}

impl From<&Entry> for ScanEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            is_dir: entry.is_dir,
        }
    }
}

/// Running counters of the scanning phase.
struct Tally {
    scanned: usize,
    total: usize,
    last_percent: u8,
}

impl Tally {
    fn new(total: usize) -> Self {
        Self {
            scanned: 0,
            total: total.max(1),
            last_percent: 0,
        }
    }

    /// The new percentage if it increased. Stays below 100 until the scan is done.
    fn advance(&mut self) -> Option<u8> {
        let percent = (self.scanned * 100 / self.total).min(99) as u8;
        if percent > self.last_percent {
            self.last_percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackgroundScanner {
    traversal: Traversal,
}

impl BackgroundScanner {
    /// The filter is cloned into the scanner; later edits to the caller's
    /// configuration do not affect it.
    pub fn new(filter: FilterConfig, options: ScanOptions) -> Self {
        Self {
            traversal: Traversal::new(filter, options),
        }
    }

    /// Run a scan on the current thread, delivering events to `sink`.
    ///
    /// The last event delivered is always terminal. Once `token` is observed
    /// as cancelled no more directories are read and the only remaining event
    /// is [`ScanEvent::Cancelled`].
    pub fn run<F>(&self, root: &Path, token: &CancellationToken, mut sink: F) -> ScanOutcome
    where
        F: FnMut(ScanEvent),
    {
        if !root.is_dir() {
            let message = format!("cannot access '{}': no such directory", root.display());
            return failed(&mut sink, message);
        }
        if !self.traversal.is_visible_dir(&root_name(root)) {
            let message = format!("'{}' is excluded by the current filters", root.display());
            return failed(&mut sink, message);
        }

        if !emit(token, &mut sink, ScanEvent::Status(ScanPhase::Counting)) {
            return cancelled(&mut sink);
        }
        let Some(total) = self.count(root, 0, token) else {
            return cancelled(&mut sink);
        };
        tracing::debug!("{} nodes to scan under {}", total, root.display());

        if !emit(token, &mut sink, ScanEvent::Status(ScanPhase::Scanning)) {
            return cancelled(&mut sink);
        }
        let mut tally = Tally::new(total);
        if !self.scan_dir(root, 0, token, &mut tally, &mut sink) {
            return cancelled(&mut sink);
        }

        sink(ScanEvent::Progress(ScanProgress {
            percent: 100,
            phase: ScanPhase::Completed,
        }));
        sink(ScanEvent::Completed);
        tracing::info!("scanned {} nodes under {}", tally.scanned, root.display());
        ScanOutcome::Completed
    }

    /// Run a scan on a dedicated worker thread.
    pub fn spawn(&self, root: impl Into<PathBuf>) -> io::Result<ScanHandle> {
        let root = root.into();
        let (tx, rx) = unbounded();
        let token = CancellationToken::new();

        let scanner = self.clone();
        let worker_root = root.clone();
        let worker_token = token.clone();
        let handle = thread::Builder::new()
            .name("treescribe-scan".to_string())
            .spawn(move || {
                scanner.run(&worker_root, &worker_token, |event| {
                    // Nobody is listening any more
                    if tx.send(event).is_err() {
                        worker_token.cancel();
                    }
                })
            })?;

        Ok(ScanHandle {
            root,
            events: rx,
            token,
            handle,
        })
    }

    /// Count the directories visited plus visible files below `dir`.
    /// `None` means the scan was cancelled.
    fn count(&self, dir: &Path, depth: usize, token: &CancellationToken) -> Option<usize> {
        if token.is_cancelled() {
            return None;
        }
        if self.traversal.at_max_depth(depth) {
            return Some(1);
        }

        let entries = match self.traversal.read_entries_with(dir, token) {
            Ok(Some(entries)) => entries,
            Ok(None) => return None,
            Err(_) => return Some(1),
        };

        let (dirs, files): (Vec<Entry>, Vec<Entry>) =
            entries.into_iter().partition(|entry| entry.is_dir);

        let subtrees: Option<Vec<usize>> = dirs
            .par_iter()
            .map(|entry| self.count(&entry.path, depth + 1, token))
            .collect();

        Some(1 + files.len() + subtrees?.into_iter().sum::<usize>())
    }

    /// Returns false when the scan was cancelled.
    fn scan_dir<F>(
        &self,
        dir: &Path,
        depth: usize,
        token: &CancellationToken,
        tally: &mut Tally,
        sink: &mut F,
    ) -> bool
    where
        F: FnMut(ScanEvent),
    {
        if token.is_cancelled() {
            return false;
        }

        tally.scanned += 1;
        if let Some(percent) = tally.advance() {
            let progress = ScanProgress {
                percent,
                phase: ScanPhase::Scanning,
            };
            if !emit(token, sink, ScanEvent::Progress(progress)) {
                return false;
            }
        }

        if self.traversal.at_max_depth(depth) {
            return emit(
                token,
                sink,
                ScanEvent::DirectoryScanned {
                    path: dir.to_path_buf(),
                    children: Vec::new(),
                },
            );
        }

        let entries = match self.traversal.read_entries_with(dir, token) {
            Ok(Some(entries)) => entries,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("cannot read {}: {}", dir.display(), e);
                return emit(
                    token,
                    sink,
                    ScanEvent::DirectoryError {
                        path: dir.to_path_buf(),
                        message: e.to_string(),
                    },
                );
            }
        };

        tracing::debug!("{}: {} visible entries", dir.display(), entries.len());
        let children = entries.iter().map(ScanEntry::from).collect();
        if !emit(
            token,
            sink,
            ScanEvent::DirectoryScanned {
                path: dir.to_path_buf(),
                children,
            },
        ) {
            return false;
        }

        for entry in &entries {
            if token.is_cancelled() {
                return false;
            }
            if entry.is_dir {
                if !self.scan_dir(&entry.path, depth + 1, token, tally, sink) {
                    return false;
                }
                continue;
            }

            tally.scanned += 1;
            if tally.scanned % PROGRESS_INTERVAL == 0 {
                if let Some(percent) = tally.advance() {
                    let progress = ScanProgress {
                        percent,
                        phase: ScanPhase::Scanning,
                    };
                    if !emit(token, sink, ScanEvent::Progress(progress)) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

/// Deliver an event unless the scan has been cancelled.
fn emit<F: FnMut(ScanEvent)>(token: &CancellationToken, sink: &mut F, event: ScanEvent) -> bool {
    if token.is_cancelled() {
        return false;
    }
    sink(event);
    true
}

fn failed<F: FnMut(ScanEvent)>(sink: &mut F, message: String) -> ScanOutcome {
    tracing::warn!("{}", message);
    sink(ScanEvent::Status(ScanPhase::Failed(message.clone())));
    sink(ScanEvent::Failed(message.clone()));
    ScanOutcome::Failed(message)
}

fn cancelled<F: FnMut(ScanEvent)>(sink: &mut F) -> ScanOutcome {
    tracing::info!("scan cancelled");
    sink(ScanEvent::Cancelled);
    ScanOutcome::Cancelled
}

/// A scan running on a worker thread.
pub struct ScanHandle {
    root: PathBuf,
    events: Receiver<ScanEvent>,
    token: CancellationToken,
    handle: JoinHandle<ScanOutcome>,
}

impl ScanHandle {
    /// Events in emission order. The channel closes after the terminal event.
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait for the worker to finish.
    pub fn join(self) -> ScanOutcome {
        self.handle
            .join()
            .unwrap_or_else(|_| ScanOutcome::Failed("scan thread panicked".to_string()))
    }
}
