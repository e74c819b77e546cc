//! Registry implementations for fetching package versions

pub mod crates_io;

pub use crates_io::CratesIoRegistry;
