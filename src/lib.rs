//! Plain-text Bridge Law Reference
//!
//! Laws and regulation articles are markdown documents stored in a directory,
//! cross-linked by a directed reference graph.

pub mod domain;
pub use domain::{
    ArticleNumber, Catalog, Config, CrossReference, DocId, Document, Hierarchy, LinkError, Session,
    Trail,
};

/// Text extraction: articles, cross-references and categories.
pub mod extract;

/// Reference-graph analysis.
pub mod analysis;

/// Filesystem storage and export of the law library.
pub mod storage;
pub use storage::{Library, Resolved};
