use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use crate::crypto::random::secure_random;
use crate::tracker::JobTracker;
use crate::{WipeError, WipeOptions, WipeResult};

/// A byte-addressable target opened for raw writing.
///
/// `File` is the real implementation; tests substitute a fixed-capacity
/// in-memory target to exercise the end-of-target handling without a
/// device node.
pub trait RawTarget: Write + Seek {
    /// Force previously buffered writes to stable storage.
    fn sync(&mut self) -> io::Result<()>;
}

impl RawTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Overwrites a raw target until its physical end, for N passes.
pub struct DeviceWiper;

impl DeviceWiper {
    pub fn wipe(path: &Path, options: &WipeOptions, tracker: &JobTracker) -> WipeResult<()> {
        let mut device = Self::open(path)?;
        Self::overwrite(&mut device, options, tracker)
    }

    /// Open for raw writing, surfacing access-rights failures as the
    /// distinct permission error with the host-specific remedy. Denied
    /// access is the most common operator mistake on device targets and
    /// must not read as a generic I/O fault.
    fn open(path: &Path) -> WipeResult<File> {
        OpenOptions::new().write(true).open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                WipeError::PermissionDenied(permission_hint().to_string())
            } else {
                WipeError::Io(e)
            }
        })
    }

    /// Run the pass loop against an already opened target.
    ///
    /// A short write and a write error both mean the physical end of the
    /// target was reached and end the current pass normally. Each pass is
    /// flushed and synced before the position is reset for the next one.
    pub fn overwrite<T: RawTarget>(
        target: &mut T,
        options: &WipeOptions,
        tracker: &JobTracker,
    ) -> WipeResult<()> {
        let random = secure_random();
        let mut block = vec![0u8; options.block_size];

        for pass in 1..=options.passes {
            tracker.push(format!(
                "[*] Pass {}/{} ... (this may take time)",
                pass, options.passes
            ));
            target.seek(SeekFrom::Start(0))?;

            loop {
                random.fill(&mut block)?;
                match target.write(&block) {
                    Ok(written) if written < block.len() => break,
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        log::debug!("write stopped pass {}: {}", pass, e);
                        break;
                    }
                }
            }

            target.flush()?;
            target.sync()?;
        }

        Ok(())
    }
}

/// Remedy for a denied open, per host environment.
pub(crate) fn permission_hint() -> &'static str {
    if cfg!(windows) {
        "Run as administrator."
    } else {
        "Run as root."
    }
}
