//! Filesystem helpers: atomic writes and the artifact store built on them.

pub mod atomic;
mod store;

pub use atomic::atomic_write_file;
pub use store::{ArtifactStore, FsArtifactStore};
