use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{WipeError, WipeResult};

#[derive(Debug, Default)]
struct TrackerState {
    running: bool,
    logs: Vec<String>,
}

/// Registry of the one wipe job allowed to run at a time.
///
/// Shared between the submission path and the worker. The `running` flag and
/// the log are guarded by one mutex, so a submitter checking the flag and a
/// submitter claiming it can never interleave: at most one caller wins
/// `try_begin` until the returned guard is dropped. Log lines are appended
/// only by the active worker.
#[derive(Debug, Default)]
pub struct JobTracker {
    state: Mutex<TrackerState>,
}

/// Snapshot of the tracker for polling front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub running: bool,
    pub logs: Vec<String>,
}

impl JobTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Atomically claim the run slot.
    ///
    /// On success the previous job's log is cleared, `running` is set and a
    /// guard is returned; dropping the guard releases the slot. A claim
    /// while a job is active is rejected without touching any state.
    pub fn try_begin(self: &Arc<Self>) -> WipeResult<RunGuard> {
        let mut state = self.lock();
        if state.running {
            return Err(WipeError::AlreadyRunning);
        }
        state.running = true;
        state.logs.clear();
        Ok(RunGuard {
            tracker: Arc::clone(self),
        })
    }

    /// Append a line to the job log.
    pub fn push(&self, line: impl Into<String>) {
        let line = line.into();
        log::debug!("job log: {}", line);
        self.lock().logs.push(line);
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// One consistent snapshot of flag and log.
    pub fn status(&self) -> JobStatus {
        let state = self.lock();
        JobStatus {
            running: state.running,
            logs: state.logs.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap()
    }
}

/// Releases the run slot when dropped, whatever the job outcome.
///
/// The worker owns the guard for the whole job, so `running` is cleared on
/// success, on error, and when the worker unwinds from a panic. The system
/// can never get stuck reporting a wipe in progress.
#[derive(Debug)]
pub struct RunGuard {
    tracker: Arc<JobTracker>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.tracker.lock().running = false;
    }
}
