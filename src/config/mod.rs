// src/config/mod.rs

//! Configuration for a supervised run.
//!
//! - [`model`] holds [`TimeoutSpec`] (one invocation) and the TOML defaults
//!   file types.
//! - [`duration`] parses `"1.5s"`-style durations.
//! - [`loader`] / [`validate`] read and check the defaults file.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, DefaultSection, RawConfigFile, RawDefaultSection, TimeoutSpec};
