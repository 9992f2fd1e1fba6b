use crate::domain::{ArticleNumber, DocId, Hierarchy};

/// A single law or regulation article.
///
/// Documents are immutable from the viewer's perspective: they are produced
/// by the extraction pipeline (or the store administrators) and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocId,
    title: String,
    page: Option<u32>,
    content: Option<String>,
    source: Option<String>,
}

impl Document {
    /// Constructs a document with a title and no content.
    #[must_use]
    pub const fn new(id: DocId, title: String) -> Self {
        Self {
            id,
            title,
            page: None,
            content: None,
            source: None,
        }
    }

    /// Sets the page the article appears on in its source document.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the free-text content of the article.
    #[must_use]
    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets the name of the source file the article was extracted from.
    #[must_use]
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    /// The document's identifier.
    #[must_use]
    pub const fn id(&self) -> DocId {
        self.id
    }

    /// The hierarchy the document belongs to.
    #[must_use]
    pub const fn hierarchy(&self) -> Hierarchy {
        self.id.hierarchy()
    }

    /// The article number, the ordering key within a hierarchy.
    #[must_use]
    pub const fn number(&self) -> ArticleNumber {
        self.id.number()
    }

    /// The document's title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The page in the source document, when known.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        self.page
    }

    /// The free-text content. Absent for stub entries that only exist as
    /// reference targets in the store.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The source file the article was extracted from, when known.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Number of whitespace-separated words in the content.
    ///
    /// Used by the export metadata table.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.content
            .as_deref()
            .map_or(0, |c| c.split_whitespace().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document::new(id.parse().unwrap(), "The Scissors Coup".to_string())
    }

    #[test]
    fn builder_sets_optional_fields() {
        let document = doc("CODE-40")
            .with_page(57)
            .with_content("See opening lead.".to_string())
            .with_source("code-2017.txt".to_string());

        assert_eq!(document.id().to_string(), "CODE-40");
        assert_eq!(document.page(), Some(57));
        assert_eq!(document.content(), Some("See opening lead."));
        assert_eq!(document.source(), Some("code-2017.txt"));
    }

    #[test]
    fn content_defaults_to_absent() {
        assert_eq!(doc("CODE-40").content(), None);
        assert_eq!(doc("CODE-40").word_count(), 0);
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        let document = doc("CODE-40").with_content("one  two\nthree".to_string());
        assert_eq!(document.word_count(), 3);
    }
}
