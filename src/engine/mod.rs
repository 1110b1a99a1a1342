// Wipe engine - routes a job to the directory or raw-device strategy and
// owns the pass loop bookkeeping around it.
//
// A job moves through classify -> wipe -> terminal log line. Every step is
// recorded in the tracker's log, and the run slot is released when the
// worker exits, whatever the outcome.

pub mod device;
pub mod directory;
pub mod file;

// Re-exports
pub use device::{DeviceWiper, RawTarget};
pub use directory::DirectoryWiper;
pub use file::FileWiper;

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::target::TargetClassifier;
use crate::tracker::{JobTracker, RunGuard};
use crate::{TargetKind, WipeError, WipeJob, WipeResult};

/// Facade over the wipe strategies.
///
/// Submission claims the tracker's run slot and hands the job to a single
/// background worker; the caller gets the join handle back immediately and
/// polls the tracker for progress. The claim happening before the spawn is
/// what makes two concurrent submissions impossible: the loser never gets a
/// worker at all.
pub struct WipeEngine {
    tracker: Arc<JobTracker>,
}

impl WipeEngine {
    pub fn new(tracker: Arc<JobTracker>) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &Arc<JobTracker> {
        &self.tracker
    }

    /// Accept `job` if it is valid and no wipe is active, then run it on a
    /// background worker.
    pub fn submit(&self, job: WipeJob) -> WipeResult<JoinHandle<()>> {
        job.validate()?;
        let guard = self.tracker.try_begin()?;
        let tracker = Arc::clone(&self.tracker);
        Ok(thread::spawn(move || {
            // Owned for the whole job so the slot is released even if the
            // job code below unwinds.
            let _guard: RunGuard = guard;
            run_job(&tracker, &job);
        }))
    }
}

/// Execute one job to completion, recording every step in the log.
///
/// All failures end in a terminal log line, never in a propagated error:
/// the worker has nobody above it to hand an `Err` to.
fn run_job(tracker: &JobTracker, job: &WipeJob) {
    let path = Path::new(&job.target);

    let kind = TargetClassifier::classify(path);
    if kind == TargetKind::Missing {
        tracker.push(format!("[-] {}", WipeError::NotFound(job.target.clone())));
        return;
    }

    tracker.push(format!(
        "[!] WARNING: This will ERASE all data on {}",
        job.target
    ));
    tracker.push(format!("[+] Starting secure wipe on {} ...", job.target));

    if kind == TargetKind::Directory {
        match DirectoryWiper::wipe(path, &job.options, tracker) {
            Ok(()) => tracker.push(format!(
                "[+] Secure wipe completed for directory {}",
                job.target
            )),
            Err(e) => tracker.push(format!("[-] Error wiping directory: {}", e)),
        }
    } else {
        // Regular files and device nodes are both raw byte-addressable
        // targets from here on.
        match DeviceWiper::wipe(path, &job.options, tracker) {
            Ok(()) => tracker.push(format!(
                "[+] Secure wipe completed for device {}",
                job.target
            )),
            Err(e) => tracker.push(format!("[-] Error wiping device: {}", e)),
        }
    }
}
