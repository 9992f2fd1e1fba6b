//! Extraction of documents, references, and categories from raw law text.
//!
//! The extraction pipeline turns the plain text of a law book into domain
//! values: [`articles`] splits the text into documents, [`references`] finds
//! the cross-references inside each document, and [`categories`] groups
//! documents by the category named in their titles.

pub mod articles;
pub use articles::extract_articles;

pub mod references;
pub use references::{Detector, Detection};

pub mod categories;
pub use categories::{CategoryName, categorise};
