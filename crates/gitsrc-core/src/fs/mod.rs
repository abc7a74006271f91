//! Filesystem primitives shared across features.

pub mod copy;
pub mod scratch;

pub use copy::copy_dir_contents;
pub use scratch::ScratchDir;
