//! Shared types, error model, and configuration for notion-sync.
//!
//! This crate is the foundation depended on by all other notion-sync crates.
//! It provides:
//! - [`NotionSyncError`]: the unified error type
//! - Domain types ([`Page`], [`Block`], [`RichText`], [`PageMetadata`])
//! - Configuration ([`AppConfig`], [`SyncConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, NotionConfig, OutputConfig, SyncConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_credentials,
};
pub use error::{NotionSyncError, Result};
pub use types::{
    Block, CodeBlock, Formula, Page, PageMetadata, PropertyValue, RichText, SelectOption,
    TextBlock, TextContent,
};
