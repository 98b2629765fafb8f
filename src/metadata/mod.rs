//! @dose
//! purpose: Metadata source abstraction. The generator never touches a concrete reflection
//!     runtime; it asks a `MetadataSource` to turn a locator (file path or library name) into a
//!     `Library`. `JsonMetadataSource` reads serialized metadata dumps.
//!
//! when-editing:
//!     - !A failed load is fatal for the run; callers must not write any output after an Err
//!     - New sources implement the MetadataSource trait and return a fully interned Library
//!
//! invariants:
//!     - An existing file path always wins over a search-path lookup
//!     - Search paths are tried in configuration order; the first hit is used
//!
//! gotchas:
//!     - Library names are looked up as `<name>.json`, so "Xamarin.Forms.Core" finds
//!       `Xamarin.Forms.Core.json`

mod library;
pub mod model;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use library::{Field, Library, Method, Property, ReflectedType, ScalarKind, TypeId};
pub use model::{LibraryDump, TypeKind};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid metadata in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Library not found: {0}")]
    NotFound(String),
}

/// Supplies reflected metadata for one library
pub trait MetadataSource {
    /// Load the library identified by `locator`
    fn load(&self, locator: &str) -> Result<Library, MetadataError>;
}

/// Reads JSON metadata dumps from disk
#[derive(Debug, Clone, Default)]
pub struct JsonMetadataSource {
    search_paths: Vec<PathBuf>,
}

impl JsonMetadataSource {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Resolve a locator to the dump file it names
    pub fn locate(&self, locator: &str) -> Result<PathBuf, MetadataError> {
        let direct = Path::new(locator);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        let file_name = format!("{}.json", locator);
        self.search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| MetadataError::NotFound(locator.to_string()))
    }

    /// Parse dump text into a Library
    pub fn parse(content: &str, origin: &str) -> Result<Library, MetadataError> {
        let dump: LibraryDump =
            serde_json::from_str(content).map_err(|source| MetadataError::InvalidJson {
                path: origin.to_string(),
                source,
            })?;
        Ok(Library::from_dump(dump))
    }
}

impl MetadataSource for JsonMetadataSource {
    fn load(&self, locator: &str) -> Result<Library, MetadataError> {
        let path = self.locate(locator)?;
        let content = fs::read_to_string(&path)?;
        Self::parse(&content, &path.to_string_lossy())
    }
}
