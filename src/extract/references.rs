//! Detection of cross-references within document text.
//!
//! A reference is a mention of another article, in any of the forms the law
//! books use: `Loi 40`, `Article 40B`, `voir Loi 40.2`, `(cf. Loi 12)` or an
//! explicit cross-hierarchy mention such as `RNC 3`. Each detection carries
//! a snippet of the surrounding text as its context.

use regex::Regex;
use tracing::instrument;

use crate::domain::{Config, DocId, Document, Hierarchy};

/// One detected reference inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// The referenced document.
    pub target: DocId,
    /// The text surrounding the mention.
    pub context: Option<String>,
}

/// Compiled reference patterns, configured once per extraction run.
#[derive(Debug)]
pub struct Detector {
    /// Mentions introduced by a keyword: `Loi 40`, `voir Article 40B`.
    keyword: Regex,
    /// Parenthesised asides: `(voir Loi 40)`, `(cf. Article 12.3)`.
    parenthesised: Regex,
    /// List items: `- Loi 40`.
    dashed: Regex,
    /// Explicit cross-hierarchy mentions: `RNC 3`, `CODE 40B`.
    tagged: Regex,
    /// Bare numbers, off by default.
    bare: Option<Regex>,
    context_window: usize,
}

const NUMBER: &str = r"(\d+[A-Za-z]?(?:\.\d+)?)";

impl Detector {
    /// Compiles the reference patterns according to the configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let compile = |pattern: &str| {
            Regex::new(pattern).unwrap_or_else(|e| unreachable!("invalid reference pattern: {e}"))
        };

        Self {
            keyword: compile(&format!(
                r"(?i)\b(?:Loi|Article|Law|Voir|Cf\.?)\s+{NUMBER}\b"
            )),
            parenthesised: compile(&format!(
                r"(?i)\(\s*(?:voir|cf\.?)\s+(?:Loi|Article|Law)\s+{NUMBER}\s*\)"
            )),
            dashed: compile(&format!(r"(?i)-\s*(?:Loi|Article|Law)\s+{NUMBER}\b")),
            tagged: compile(&format!(r"\b(CODE|RNC)[\s-]{NUMBER}\b")),
            // No look-around in the regex crate; anchor on surrounding
            // whitespace instead and keep the match short.
            bare: config
                .detect_bare_numbers
                .then(|| compile(r"(?:^|\s)(\d{1,3})(?:[\s.,;:)]|$)")),
            context_window: config.context_window(),
        }
    }

    /// Finds all references inside one document.
    ///
    /// Detections are deduplicated by target, keeping the first mention's
    /// context. Self-references are dropped: an article restating its own
    /// number is not a navigation edge.
    #[instrument(skip(self, document), fields(id = %document.id()))]
    #[must_use]
    pub fn detect(&self, document: &Document) -> Vec<Detection> {
        let Some(text) = document.content() else {
            return Vec::new();
        };
        let own = document.id();

        let mut detections: Vec<Detection> = Vec::new();
        let mut push = |target: DocId, range: std::ops::Range<usize>| {
            if target == own {
                return;
            }
            if detections.iter().any(|d| d.target == target) {
                return;
            }
            detections.push(Detection {
                target,
                context: self.snippet(text, range),
            });
        };

        for pattern in [&self.keyword, &self.parenthesised, &self.dashed] {
            for captures in pattern.captures_iter(text) {
                if let Ok(number) = captures[1].parse() {
                    let whole = captures.get(0).map_or(0..0, |m| m.range());
                    push(DocId::new(own.hierarchy(), number), whole);
                }
            }
        }

        for captures in self.tagged.captures_iter(text) {
            let hierarchy = match &captures[1] {
                "CODE" => Hierarchy::Code,
                _ => Hierarchy::Rnc,
            };
            if let Ok(number) = captures[2].parse() {
                let whole = captures.get(0).map_or(0..0, |m| m.range());
                push(DocId::new(hierarchy, number), whole);
            }
        }

        if let Some(bare) = &self.bare {
            for captures in bare.captures_iter(text) {
                if let Ok(number) = captures[1].parse() {
                    let range = captures.get(1).map_or(0..0, |m| m.range());
                    push(DocId::new(own.hierarchy(), number), range);
                }
            }
        }

        detections
    }

    /// Extracts the text surrounding a match, clamped to char boundaries.
    fn snippet(&self, text: &str, range: std::ops::Range<usize>) -> Option<String> {
        if self.context_window == 0 {
            return None;
        }
        let half = self.context_window / 2;

        let start = text[..range.start]
            .char_indices()
            .rev()
            .take(half)
            .last()
            .map_or(range.start, |(i, _)| i);
        let end = text[range.end..]
            .char_indices()
            .nth(half)
            .map_or(text.len(), |(i, _)| range.end + i);

        let snippet = text[start..end].replace('\n', " ");
        let snippet = snippet.trim();
        (!snippet.is_empty()).then(|| snippet.to_string())
    }
}
