//! Domain models for the law library.
//!
//! This module contains the core domain types: documents, their identifiers,
//! the in-memory catalog with its cross-reference graph, and the navigation
//! state machines used by the viewers.

/// Article number types and parsing.
pub mod number;
pub use number::{ArticleNumber, Error as NumberError};

/// Document identifiers and hierarchies.
pub mod doc_id;
pub use doc_id::{DocId, Error as DocIdError, Hierarchy};

mod document;
pub use document::Document;

/// In-memory catalog of documents and cross-references.
pub mod catalog;
pub use catalog::{Catalog, CrossReference, LinkError, LinkOutcome};

mod config;
pub use config::Config;

/// Breadcrumb trail of visited documents.
pub mod trail;
pub use trail::{Error as TrailError, Trail};

/// Viewing-session state machine (tabs, selection, in-flight requests).
pub mod session;
pub use session::{Completion, Outcome, Request, Session, Tab};
