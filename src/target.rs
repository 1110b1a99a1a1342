use std::fs;
use std::path::Path;

use crate::TargetKind;

/// Resolves what kind of wipe target a path points at.
///
/// The answer is taken once at job start and not re-checked mid-run. A
/// dangling symlink classifies as `Missing` since there is nothing behind
/// it to overwrite. Everything that exists and is not a directory is a
/// byte-addressable raw write target; `File` vs `Device` only records what
/// the node looked like for listings and log lines.
pub struct TargetClassifier;

impl TargetClassifier {
    pub fn classify(path: &Path) -> TargetKind {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(_) => return TargetKind::Missing,
        };

        if metadata.is_dir() {
            TargetKind::Directory
        } else if metadata.is_file() {
            TargetKind::File
        } else {
            TargetKind::Device
        }
    }
}
