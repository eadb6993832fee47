//! Blob-store handler implementations.

pub mod filesystem;
pub mod memory;
