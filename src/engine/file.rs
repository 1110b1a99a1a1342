use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::crypto::random::secure_random;
use crate::{WipeOptions, WipeResult};

/// Overwrites one regular file's full extent, then removes the entry.
pub struct FileWiper;

impl FileWiper {
    /// Every byte in `[0, size)` is rewritten once per pass; the final
    /// block of a pass is truncated to the remaining byte count so the
    /// file's length never changes while it is being wiped. Each pass ends
    /// with a flush and a durable sync before the next one starts.
    pub fn wipe(path: &Path, options: &WipeOptions) -> WipeResult<()> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let size = file.seek(SeekFrom::End(0))?;

        Self::overwrite(&mut file, size, options)?;

        drop(file);
        fs::remove_file(path)?;
        Ok(())
    }

    fn overwrite(file: &mut File, size: u64, options: &WipeOptions) -> WipeResult<()> {
        let random = secure_random();
        let mut block = vec![0u8; options.block_size];

        for _ in 0..options.passes {
            file.seek(SeekFrom::Start(0))?;
            let mut remaining = size;
            while remaining > 0 {
                let chunk = remaining.min(options.block_size as u64) as usize;
                random.fill(&mut block[..chunk])?;
                file.write_all(&block[..chunk])?;
                remaining -= chunk as u64;
            }
            file.flush()?;
            file.sync_all()?;
        }

        Ok(())
    }
}
