//! Offline subcommands that read the data directory directly.

pub mod export;
pub mod stats;

pub use export::export;
pub use stats::stats;
