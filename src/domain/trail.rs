//! Breadcrumb trail of visited documents.
//!
//! A [`Trail`] records the path of reference-follows that led to the
//! currently viewed document. It grows by one when a reference is followed
//! and truncates when an earlier crumb is jumped to; it never reorders.

use nonempty::NonEmpty;
use thiserror::Error;

use crate::domain::DocId;

/// The navigation trail of a browsing session.
///
/// Either nothing has been viewed yet, or a non-empty path of documents has
/// been walked. The last entry is always the document currently in view, so
/// the "viewing" state cannot exist with an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Trail {
    /// No document has been viewed since the last reset.
    #[default]
    Empty,
    /// A path of visited documents; the last entry is the current view.
    Viewing(NonEmpty<DocId>),
}

/// Errors raised by trail navigation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A jump targeted a position beyond the end of the trail.
    #[error("trail position {index} is out of range (trail has {len} entries)")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// The number of entries in the trail.
        len: usize,
    },
}

impl Trail {
    /// Starts a trail at a single document.
    #[must_use]
    pub fn starting_at(id: DocId) -> Self {
        Self::Viewing(NonEmpty::new(id))
    }

    /// The document currently in view, if any.
    #[must_use]
    pub fn current(&self) -> Option<DocId> {
        match self {
            Self::Empty => None,
            Self::Viewing(path) => Some(*path.last()),
        }
    }

    /// Number of entries in the trail.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Viewing(path) => path.len(),
        }
    }

    /// Whether the trail holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The entries of the trail, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<DocId> {
        match self {
            Self::Empty => Vec::new(),
            Self::Viewing(path) => path.iter().copied().collect(),
        }
    }

    /// Appends a followed document to the trail and views it.
    ///
    /// Following a reference always appends, even when the document already
    /// appears earlier in the trail; revisiting is part of the path walked.
    pub fn follow(&mut self, id: DocId) {
        match self {
            Self::Empty => *self = Self::starting_at(id),
            Self::Viewing(path) => path.push(id),
        }
    }

    /// Jumps back to the crumb at `index`, discarding everything after it.
    ///
    /// Jumping to the last position is a no-op. The entry jumped to becomes
    /// the current view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] when `index` is past the end of the
    /// trail; the trail is left unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<DocId, Error> {
        let Self::Viewing(path) = self else {
            return Err(Error::OutOfRange { index, len: 0 });
        };

        if index >= path.len() {
            return Err(Error::OutOfRange {
                index,
                len: path.len(),
            });
        }

        let truncated: Vec<DocId> = path.iter().copied().take(index + 1).collect();
        // Non-empty by construction: index < len implies at least one entry.
        *path = NonEmpty::from_vec(truncated)
            .unwrap_or_else(|| NonEmpty::new(*path.first()));
        Ok(*path.last())
    }

    /// Clears the trail back to the empty state.
    pub fn reset(&mut self) {
        *self = Self::Empty;
    }
}
