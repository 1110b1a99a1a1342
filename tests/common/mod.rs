//! Shared test infrastructure for the integration tests.
//!
//! Provides a fixed-capacity in-memory target standing in for a raw block
//! device, plus small directory-tree builders.

use std::fs;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use vanish_wipe::engine::RawTarget;

/// Simulated raw device with a hard end: writes past the capacity are cut
/// short, exactly like a block device running out of sectors.
pub struct FixedCapacityTarget {
    data: Vec<u8>,
    pos: u64,
    pub writes: u32,
    pub short_writes: u32,
    pub syncs: u32,
}

#[allow(dead_code)]
impl FixedCapacityTarget {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            pos: 0,
            writes: 0,
            short_writes: 0,
            syncs: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl Write for FixedCapacityTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let capacity = self.data.len() as u64;
        if self.pos >= capacity {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "no space left on device",
            ));
        }

        let available = (capacity - self.pos) as usize;
        let n = available.min(buf.len());
        let start = self.pos as usize;
        self.data[start..start + n].copy_from_slice(&buf[..n]);
        self.pos += n as u64;

        self.writes += 1;
        if n < buf.len() {
            self.short_writes += 1;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FixedCapacityTarget {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let capacity = self.data.len() as i64;
        let next = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => capacity + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if next < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start",
            ));
        }
        self.pos = next as u64;
        Ok(self.pos)
    }
}

impl RawTarget for FixedCapacityTarget {
    fn sync(&mut self) -> io::Result<()> {
        self.syncs += 1;
        Ok(())
    }
}

/// Create a file with the given content under `dir`, returning its path.
#[allow(dead_code)]
pub fn create_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, content).expect("write fixture file");
    path
}
