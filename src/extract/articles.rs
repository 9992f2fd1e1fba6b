//! Splitting raw law-book text into individual documents.
//!
//! Articles are delimited by heading lines starting with `LOI 40`, `ARTICLE
//! 40B` or `LAW 40.2`. Everything between one heading and the next belongs
//! to the article opened by the first heading. Page numbers are derived from
//! form-feed characters, as produced by `pdftotext`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{instrument, warn};

use crate::domain::{ArticleNumber, DocId, Document, Hierarchy};

// Headings are uppercase and start the line; in-body mentions ("voir Loi
// 40") are mixed case and mid-sentence, and must not open a new article.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:LOI|ARTICLE|LAW)\s+(\d+[A-Z]?(?:\.\d+)?)\b")
        .unwrap_or_else(|e| unreachable!("invalid heading pattern: {e}"))
});

/// Splits raw text into documents belonging to one hierarchy.
///
/// Each heading opens a new document whose title is the heading line and
/// whose content runs until the next heading. When the same article number
/// appears twice the later occurrence wins and a warning is logged. Headings
/// whose number does not parse (a zero major, for instance) are treated as
/// ordinary content.
#[instrument(skip(text, source), fields(chars = text.len()))]
#[must_use]
pub fn extract_articles(
    text: &str,
    hierarchy: Hierarchy,
    source: Option<&str>,
) -> Vec<Document> {
    let mut documents: Vec<Document> = Vec::new();
    let mut current: Option<(DocId, u32, Vec<&str>)> = None;
    let mut page: u32 = 1;

    for line in text.split('\n') {
        // pdftotext emits a form feed ahead of the first line of each page.
        let feeds = line.matches('\x0c').count();
        let line = line.trim_matches('\x0c');
        page += u32::try_from(feeds).unwrap_or(0);

        if let Some(number) = heading_number(line) {
            if let Some(article) = current.take() {
                finish(&mut documents, article, source);
            }
            current = Some((DocId::new(hierarchy, number), page, vec![line]));
        } else if let Some((_, _, content)) = &mut current {
            content.push(line);
        }
    }

    if let Some(article) = current.take() {
        finish(&mut documents, article, source);
    }

    documents
}

fn heading_number(line: &str) -> Option<ArticleNumber> {
    let captures = HEADING.captures(line.trim_start())?;
    captures[1].parse().ok()
}

fn finish(
    documents: &mut Vec<Document>,
    (id, page, content): (DocId, u32, Vec<&str>),
    source: Option<&str>,
) {
    let title = content
        .first()
        .map_or_else(String::new, |line| line.trim().to_string());
    // The heading line becomes the title; the body is everything after it.
    let body = content
        .get(1..)
        .unwrap_or_default()
        .join("\n")
        .trim()
        .to_string();

    let mut document = Document::new(id, title).with_page(page);
    if !body.is_empty() {
        document = document.with_content(body);
    }
    if let Some(source) = source {
        document = document.with_source(source.to_string());
    }

    if let Some(existing) = documents.iter().position(|doc| doc.id() == id) {
        warn!(%id, "duplicate article heading, keeping the later occurrence");
        documents[existing] = document;
    } else {
        documents.push(document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_at_headings() {
        let text = "LOI 1 - LE JEU\nFirst body line.\nSecond body line.\n\
                    LOI 2 - LES CARTES\nAnother body.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id().to_string(), "CODE-1");
        assert_eq!(documents[0].title(), "LOI 1 - LE JEU");
        assert!(documents[0].content().unwrap().contains("Second body line."));
        assert_eq!(documents[1].id().to_string(), "CODE-2");
    }

    #[test]
    fn recognises_suffix_and_subsection_headings() {
        let text = "ARTICLE 40B\nBody.\nLAW 40.2\nMore.\n";
        let documents = extract_articles(text, Hierarchy::Rnc, None);

        let ids: Vec<String> = documents.iter().map(|d| d.id().to_string()).collect();
        assert_eq!(ids, ["RNC-40B", "RNC-40.2"]);
    }

    #[test]
    fn in_body_mentions_do_not_open_articles() {
        let text = "LOI 1\nBody text, voir Loi 40 pour les détails.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id().to_string(), "CODE-1");
    }

    #[test]
    fn text_before_the_first_heading_is_discarded() {
        let text = "Preamble text with no heading.\nLOI 7\nBody.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id().to_string(), "CODE-7");
    }

    #[test]
    fn pages_follow_form_feeds() {
        let text = "LOI 1\nBody.\n\x0cLOI 2\nBody.\n\x0c\x0cLOI 3\nBody.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        let pages: Vec<Option<u32>> = documents.iter().map(Document::page).collect();
        assert_eq!(pages, [Some(1), Some(2), Some(4)]);
    }

    #[test]
    fn later_duplicate_heading_replaces_the_earlier_one() {
        let text = "LOI 40\nOld body.\nLOI 40\nNew body.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        assert_eq!(documents.len(), 1);
        assert!(documents[0].content().unwrap().contains("New body."));
    }

    #[test]
    fn source_is_attached_to_every_document() {
        let text = "LOI 1\nBody.\nLOI 2\nBody.\n";
        let documents = extract_articles(text, Hierarchy::Code, Some("code2017.txt"));

        assert!(documents
            .iter()
            .all(|doc| doc.source() == Some("code2017.txt")));
    }

    #[test]
    fn zero_major_heading_is_ordinary_content() {
        let text = "LOI 1\nSee the preface.\nLOI 0\nNot a real article.\n";
        let documents = extract_articles(text, Hierarchy::Code, None);

        assert_eq!(documents.len(), 1);
        assert!(documents[0].content().unwrap().contains("LOI 0"));
    }
}
