// Allow uppercase acronyms for industry-standard terms like RNG
#![allow(clippy::upper_case_acronyms)]

pub mod crypto;
pub mod drives;
pub mod engine;
pub mod target;
pub mod tracker;

// Re-export the main entry points for convenience
pub use engine::WipeEngine;
pub use target::TargetClassifier;
pub use tracker::{JobStatus, JobTracker, RunGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of overwrite passes.
pub const DEFAULT_PASSES: u32 = 3;

/// Default write block size (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

// Error types shared by the engine and the front ends
#[derive(Error, Debug)]
pub enum WipeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path {0} not found!")]
    NotFound(String),

    #[error("Permission denied! {0}")]
    PermissionDenied(String),

    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Wipe already in progress")]
    AlreadyRunning,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type WipeResult<T> = Result<T, WipeError>;

/// What kind of thing a wipe target path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// The path does not exist on the filesystem.
    Missing,
    /// A directory tree whose regular files will be wiped one by one.
    Directory,
    /// A regular file, wiped as a raw byte-addressable target.
    File,
    /// A device node or other non-directory special target.
    Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeOptions {
    pub passes: u32,
    pub block_size: usize,
}

impl Default for WipeOptions {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// One requested wipe: a target path plus overwrite options. Created when a
/// wipe is submitted and discarded when the job finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeJob {
    pub target: String,
    pub options: WipeOptions,
}

impl WipeJob {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            options: WipeOptions::default(),
        }
    }

    pub fn with_options(target: impl Into<String>, options: WipeOptions) -> Self {
        Self {
            target: target.into(),
            options,
        }
    }

    /// Check the job invariants before any work starts.
    pub fn validate(&self) -> WipeResult<()> {
        if self.target.is_empty() {
            return Err(WipeError::InvalidInput("target path is required".into()));
        }
        if self.options.passes == 0 {
            return Err(WipeError::InvalidInput(
                "pass count must be at least 1".into(),
            ));
        }
        if self.options.block_size == 0 {
            return Err(WipeError::InvalidInput(
                "block size must be at least 1 byte".into(),
            ));
        }
        Ok(())
    }
}
