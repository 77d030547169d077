//! Shared error model and configuration for SkillPress.
//!
//! This crate is the foundation depended on by all other SkillPress crates.
//! It provides:
//! - [`SkillPressError`] — the unified error type
//! - Configuration ([`AppConfig`], [`FetchConfig`], [`BundleConfig`], config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BundleConfig, FetchConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, SkillPressError};
