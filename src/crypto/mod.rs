pub mod random;


// Re-export
pub use random::{secure_random, EntropySource, RandomSource};
