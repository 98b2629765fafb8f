//! @dose
//! purpose: Library crate root for defgen, exposing the public API for use as both a CLI tool
//!     and a library. Re-exports the generator, the metadata source abstraction, and config.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - The generator depends only on `metadata::Library`, never on how it was loaded
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod cli;
pub mod commands;
pub mod config;
pub mod exclusion;
pub mod formatter;
pub mod generator;
pub mod metadata;

// Re-export main types for convenience
pub use cli::Cli;
pub use config::Config;
pub use generator::{GenerationRun, Generator};
pub use metadata::{JsonMetadataSource, Library, MetadataError, MetadataSource, TypeId};
