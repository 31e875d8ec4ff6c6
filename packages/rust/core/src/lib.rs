//! Core sync logic for notion-sync.
//!
//! This crate ties together the Notion client, the block renderer, metadata
//! extraction, and file writing into the end-to-end [`pipeline::sync`] run.

pub mod metadata;
pub mod pipeline;
pub mod writer;

pub use metadata::extract_metadata;
pub use pipeline::{ProgressReporter, SilentProgress, SyncReport, sync};
pub use writer::{OutputPath, WrittenDocument, resolve_output_path, write_document};
