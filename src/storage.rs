//! Filesystem persistence of the law library.
//!
//! Each document is a markdown file with YAML frontmatter, named after its
//! id (`CODE-40.md`). The [`Library`] loads a whole directory into a
//! [`crate::Catalog`](crate::domain::Catalog) and resolves lookups against
//! it; [`export`] writes the catalog out in tabular and seed formats.

use std::path::{Path, PathBuf};

use crate::domain::DocId;

/// Markdown serialization for documents.
pub mod markdown;
pub use markdown::{LoadError, MarkdownDocument};

pub mod library;
pub use library::{Library, OpenError, Resolved};

pub mod export;

/// Directory inside the library root holding configuration and metadata.
pub const METADATA_DIR: &str = ".lawbook";

/// The file path a document is stored at.
#[must_use]
pub fn path_for(root: &Path, id: DocId) -> PathBuf {
    root.join(format!("{id}.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_path_is_id_dot_md() {
        let id: DocId = "CODE-40B.2".parse().unwrap();
        assert_eq!(
            path_for(Path::new("/lib"), id),
            Path::new("/lib/CODE-40B.2.md")
        );
    }
}
