//! # brokkr-core
//!
//! Core library for the Brokkr CLI providing:
//! - Runtime configuration resolved once at startup (`RuntimeConfig`)
//! - Project name and version validation
//! - Shared filesystem and process helpers

pub mod config;
pub mod error;
pub mod utils;
pub mod validation;

pub use config::RuntimeConfig;
pub use error::{Error, Result};
pub use utils::get_home_dir;
