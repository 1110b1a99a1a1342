use anyhow::{anyhow, Result};
use ring::rand::{SecureRandom, SystemRandom};
use std::fs::File;
use std::io::Read;

use crate::{WipeError, WipeResult};

/// Trait for entropy sources
pub trait EntropySource: Send + Sync {
    /// Fill buffer with random bytes
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;
    /// Check if source is available
    fn is_available(&self) -> bool;
    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Ring-based system random (uses OS facilities)
pub struct RingSystemRNG {
    rng: SystemRandom,
}

impl Default for RingSystemRNG {
    fn default() -> Self {
        Self::new()
    }
}

impl RingSystemRNG {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl EntropySource for RingSystemRNG {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .fill(dest)
            .map_err(|_| anyhow!("Ring SystemRandom failed"))?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "RingSystemRNG"
    }
}

/// OS urandom entropy source
pub struct URandom {
    available: bool,
}

impl Default for URandom {
    fn default() -> Self {
        Self::new()
    }
}

impl URandom {
    pub fn new() -> Self {
        let available = std::path::Path::new("/dev/urandom").exists();
        Self { available }
    }
}

impl EntropySource for URandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        if !self.available {
            return Err(anyhow!("/dev/urandom not available"));
        }

        let mut file = File::open("/dev/urandom")
            .map_err(|e| anyhow!("Failed to open /dev/urandom: {}", e))?;

        file.read_exact(dest)
            .map_err(|e| anyhow!("Failed to read from /dev/urandom: {}", e))?;

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "URandom"
    }
}

/// Produces unpredictable byte blocks for overwrite passes.
///
/// Sources are tried in order; each is cryptographically strong on its own,
/// the later ones only cover environments where an earlier one is missing.
/// If every source fails the caller must abort the pass — a wipe performed
/// with predictable data must never look like a successful one.
pub struct RandomSource {
    sources: Vec<Box<dyn EntropySource>>,
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(RingSystemRNG::new()), Box::new(URandom::new())],
        }
    }

    /// Fill `dest` from the first source that succeeds.
    pub fn fill(&self, dest: &mut [u8]) -> WipeResult<()> {
        for source in &self.sources {
            if !source.is_available() {
                continue;
            }
            match source.fill_bytes(dest) {
                Ok(()) => return Ok(()),
                Err(e) => log::warn!("entropy source {} failed: {}", source.name(), e),
            }
        }
        Err(WipeError::RandomnessUnavailable(
            "no usable entropy source".into(),
        ))
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_SOURCE: RandomSource = RandomSource::new();
}

/// Get the process-wide random source.
pub fn secure_random() -> &'static RandomSource {
    &GLOBAL_SOURCE
}
