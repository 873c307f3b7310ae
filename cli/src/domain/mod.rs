//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application` or `std::fs`. All functions take data in and
//! return data out.

pub mod config;
pub mod error;

pub use config::{KfoConfig, validate_mount_folder};
pub use error::{ConfigError, InputError};
