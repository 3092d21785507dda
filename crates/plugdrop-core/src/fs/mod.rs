//! Filesystem primitives shared across features.

pub mod atomic;
pub mod copy;
pub mod digest;

pub use atomic::write_atomic;
pub use copy::{CopyStats, copy_tree};
pub use digest::{hash_file, hash_tree};
