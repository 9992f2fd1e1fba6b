//! Grouping documents into categories named by their titles.
//!
//! Law titles embed a category after the number, as in `LOI 40 - ENTAME ET
//! JEU DE LA CARTE`. Documents whose titles carry no category land in a
//! catch-all group.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

use crate::domain::{DocId, Document};

static CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:LOI|ARTICLE|LAW)\s+\d+[A-Z]?(?:\.\d+)?\s+-\s+(.*?)(?:\.{2,}|\s{2,}|$)")
        .unwrap_or_else(|e| unreachable!("invalid category pattern: {e}"))
});

/// The name of a category group; never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryName(NonEmptyString);

impl CategoryName {
    /// The catch-all group for documents without a category in their title.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new("Other").unwrap_or_else(|| unreachable!("fallback name is non-empty"))
    }

    /// Creates a category name, declining empty or whitespace-only input.
    #[must_use]
    pub fn new(name: &str) -> Option<Self> {
        NonEmptyString::new(name.trim().to_string()).ok().map(Self)
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for CategoryName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Extracts the category named in a document title, if any.
#[must_use]
pub fn category_of(title: &str) -> Option<CategoryName> {
    let captures = CATEGORY.captures(title)?;
    CategoryName::new(&captures[1])
}

/// Groups documents by the category in their titles.
///
/// Groups come out in name order; within a group, ids keep the catalog's
/// numeric order. Documents without a recognisable category fall into
/// [`CategoryName::fallback`].
#[must_use]
pub fn categorise<'a, I>(documents: I) -> BTreeMap<CategoryName, Vec<DocId>>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut groups: BTreeMap<CategoryName, Vec<DocId>> = BTreeMap::new();

    for document in documents {
        let category = category_of(document.title()).unwrap_or_else(CategoryName::fallback);
        groups.entry(category).or_default().push(document.id());
    }

    groups
}
