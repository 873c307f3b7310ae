//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all filesystem access. Imports from `crate::domain`
//! and `crate::application::ports` are allowed. Imports from
//! `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod fragments;

pub use config::{CONFIG_ENV, YamlConfigStore};
pub use fragments::{DirectorySource, SingleFileSource};
