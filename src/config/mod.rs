//! JSON configuration for the command-line tools.

pub mod analyze;

pub use analyze::{load_config, OutputConfig, RuntimeConfig};
