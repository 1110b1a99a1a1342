use std::fs;
use std::path::Path;

use super::file::FileWiper;
use crate::tracker::JobTracker;
use crate::{WipeError, WipeOptions, WipeResult};

/// Walks a directory tree and wipes every regular file found.
///
/// One locked or unreadable file must not keep the rest of a tree from
/// being wiped, so per-file failures are logged and the walk continues;
/// it completes once every discovered file has been attempted. The one
/// exception is losing the randomness source, which would fail every
/// remaining file the same way and aborts the walk instead. Directories
/// are left in place.
pub struct DirectoryWiper;

impl DirectoryWiper {
    pub fn wipe(root: &Path, options: &WipeOptions, tracker: &JobTracker) -> WipeResult<()> {
        Self::walk(root, options, tracker)
    }

    fn walk(dir: &Path, options: &WipeOptions, tracker: &JobTracker) -> WipeResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracker.push(format!("[-] Error reading {}: {}", dir.display(), e));
                return Ok(());
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracker.push(format!("[-] Error reading {}: {}", dir.display(), e));
                    continue;
                }
            };
            let path = entry.path();

            // Symlinks are never followed; a link pointing back up the
            // tree would otherwise walk forever.
            let file_type = match path.symlink_metadata() {
                Ok(metadata) => metadata.file_type(),
                Err(e) => {
                    tracker.push(format!("[-] Error wiping {}: {}", path.display(), e));
                    continue;
                }
            };

            if file_type.is_symlink() {
                log::debug!("skipping symlink {}", path.display());
            } else if file_type.is_dir() {
                Self::walk(&path, options, tracker)?;
            } else if file_type.is_file() {
                match FileWiper::wipe(&path, options) {
                    Ok(()) => {
                        tracker.push(format!("[+] Wiped and deleted {}", path.display()))
                    }
                    Err(e @ WipeError::RandomnessUnavailable(_)) => {
                        tracker.push(format!("[-] Error wiping {}: {}", path.display(), e));
                        return Err(e);
                    }
                    Err(e) => {
                        tracker.push(format!("[-] Error wiping {}: {}", path.display(), e))
                    }
                }
            } else {
                log::debug!("skipping special entry {}", path.display());
            }
        }

        Ok(())
    }
}
