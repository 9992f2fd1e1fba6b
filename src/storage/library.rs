//! A filesystem backed library of law documents.
//!
//! The [`Library`] wraps the filesystem agnostic
//! [`Catalog`](crate::domain::Catalog): opening a library walks the root
//! directory, parses every markdown file in parallel, and builds the catalog
//! and its reference graph in memory.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::{
    domain::{Catalog, Config, CrossReference, DocId, Document},
    storage::{markdown::MarkdownDocument, path_for, METADATA_DIR},
};

/// A library of law documents rooted at a directory.
#[derive(Debug)]
pub struct Library {
    root: PathBuf,
    config: Config,
    catalog: Catalog,
}

/// Errors that can occur when opening a library.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Markdown files were found whose names are not valid document ids, and
    /// the configuration does not allow them.
    #[error("unrecognised files: {}", format_paths(.0))]
    UnrecognisedFiles(Vec<PathBuf>),
    /// Two files on disk declare the same document id.
    #[error("duplicate document id {0}")]
    DuplicateId(DocId),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The result of looking a document up in the library.
///
/// A missing document is a state, not a failure: broken references are
/// allowed to exist, and following one lands here.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The document exists; its outbound references come sorted by target.
    Found {
        /// The resolved document.
        document: &'a Document,
        /// Outbound references, ascending by target id.
        references: Vec<CrossReference>,
    },
    /// No document with this id exists in the library.
    Missing(DocId),
}

impl Library {
    /// Opens the library at `root`, loading every document into memory.
    ///
    /// Configuration is read from `.lawbook/config.toml` under the root; a
    /// missing or unreadable config falls back to the default. Files whose
    /// names are not valid document ids, or that fail to parse, are skipped
    /// when `allow_unrecognised` is set and rejected otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError::UnrecognisedFiles`] for unparseable files when
    /// the configuration forbids them, or [`OpenError::DuplicateId`] when
    /// two files declare the same id.
    #[instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self, OpenError> {
        let config = load_config(root);
        let paths = collect_markdown_paths(root);

        let (loaded, unrecognised): (Vec<_>, Vec<_>) = paths
            .par_iter()
            .map(|path| try_load_document(path))
            .partition(Result::is_ok);

        let loaded: Vec<MarkdownDocument> = loaded.into_iter().map(Result::unwrap).collect();
        let unrecognised: Vec<PathBuf> = unrecognised.into_iter().map(Result::unwrap_err).collect();

        if !config.allow_unrecognised && !unrecognised.is_empty() {
            return Err(OpenError::UnrecognisedFiles(unrecognised));
        }

        let mut catalog = Catalog::with_capacity(loaded.len());
        let mut references: Vec<(DocId, DocId, Option<String>)> = Vec::new();

        for markdown in loaded {
            let (document, targets) = markdown.into_parts();
            let id = document.id();
            if catalog.contains(id) {
                return Err(OpenError::DuplicateId(id));
            }
            catalog.insert(document);
            references.extend(
                targets
                    .into_iter()
                    .map(|(target, context)| (id, target, context)),
            );
        }

        for (from, to, context) in references {
            if !config.keep_broken_references && !catalog.contains(to) {
                debug!(%from, %to, "dropping reference to a missing document");
                continue;
            }
            if let Err(error) = catalog.add_reference(from, to, context) {
                warn!(%from, %to, %error, "skipping unusable reference");
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            catalog,
        })
    }

    /// The library root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The library configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The in-memory catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Looks up a document and its outbound references.
    #[must_use]
    pub fn resolve(&self, id: DocId) -> Resolved<'_> {
        self.catalog.document(id).map_or(Resolved::Missing(id), |document| {
            Resolved::Found {
                document,
                references: self.catalog.references_from(id),
            }
        })
    }

    /// Adds a document with its references and writes it to disk.
    ///
    /// An existing document with the same id is replaced on disk but must
    /// not already be in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    ///
    /// # Panics
    ///
    /// Panics if the catalog already contains the document id.
    pub fn insert(
        &mut self,
        document: Document,
        references: Vec<(DocId, Option<String>)>,
    ) -> std::io::Result<()> {
        let id = document.id();
        self.catalog.insert(document);

        for (target, context) in references {
            if !self.config.keep_broken_references && !self.catalog.contains(target) {
                continue;
            }
            if let Err(error) = self.catalog.add_reference(id, target, context) {
                warn!(%id, %target, %error, "skipping unusable reference");
            }
        }

        self.flush(id)
    }

    /// Rewrites the file of one document from the catalog state.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not in the catalog or the file
    /// cannot be written.
    pub fn flush(&self, id: DocId) -> std::io::Result<()> {
        let document = self.catalog.document(id).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("document {id} is not in the catalog"),
            )
        })?;

        let markdown = MarkdownDocument::new(document, &self.catalog.references_from(id));
        markdown.save_to_path(&path_for(&self.root, id))
    }

    /// Writes the current configuration to `.lawbook/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_config(&self) -> Result<(), String> {
        let dir = self.root.join(METADATA_DIR);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create metadata directory: {e}"))?;
        self.config.save(&dir.join("config.toml"))
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(METADATA_DIR).join("config.toml");
    Config::load(&path).unwrap_or_else(|e| {
        debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn collect_markdown_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            // Skip the metadata directory
            !entry
                .path()
                .components()
                .any(|c| c.as_os_str() == METADATA_DIR)
        })
        .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn try_load_document(path: &Path) -> Result<MarkdownDocument, PathBuf> {
    match MarkdownDocument::load(path) {
        Ok(document) => Ok(document),
        Err(e) => {
            debug!("Skipping unparseable file at {}: {e:?}", path.display());
            Err(path.to_path_buf())
        }
    }
}
