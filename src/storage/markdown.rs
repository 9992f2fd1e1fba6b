use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::domain::{doc_id, CrossReference, DocId, Document};

/// A document serialized in markdown format with YAML frontmatter.
///
/// The frontmatter carries the page, the source file, and the outbound
/// references; the first heading carries the id and title, and the rest of
/// the file is the document body.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    frontmatter: FrontMatter,
    id: DocId,
    title: String,
    body: String,
}

impl MarkdownDocument {
    /// Pairs a document with its outbound references for serialization.
    #[must_use]
    pub fn new(document: &Document, references: &[CrossReference]) -> Self {
        let frontmatter = FrontMatter {
            page: document.page(),
            source: document.source().map(ToString::to_string),
            references: references
                .iter()
                .map(|reference| Reference {
                    target: reference.to,
                    context: reference.context.clone(),
                })
                .collect(),
        };

        Self {
            frontmatter,
            id: document.id(),
            title: document.title().to_string(),
            body: document.content().unwrap_or_default().to_string(),
        }
    }

    /// The document id.
    #[must_use]
    pub const fn id(&self) -> DocId {
        self.id
    }

    /// Converts back into a domain document and its reference targets.
    #[must_use]
    pub fn into_parts(self) -> (Document, Vec<(DocId, Option<String>)>) {
        let mut document = Document::new(self.id, self.title);
        if let Some(page) = self.frontmatter.page {
            document = document.with_page(page);
        }
        if !self.body.is_empty() {
            document = document.with_content(self.body);
        }
        if let Some(source) = self.frontmatter.source {
            document = document.with_source(source);
        }

        let references = self
            .frontmatter
            .references
            .into_iter()
            .map(|reference| (reference.target, reference.context))
            .collect();

        (document, references)
    }

    /// Writes the document as frontmatter plus markdown body.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontmatter cannot be serialized or the
    /// writer fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frontmatter = serde_yaml::to_string(&self.frontmatter)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let heading = format!("# {} {}", self.id, self.title);

        let result = if self.body.is_empty() {
            format!("---\n{frontmatter}---\n{heading}\n")
        } else {
            format!("---\n{frontmatter}---\n{heading}\n\n{}\n", self.body)
        };

        writer.write_all(result.as_bytes())
    }

    pub(crate) fn read<R: BufRead>(reader: &mut R) -> Result<Self, LoadError> {
        let mut lines = reader.lines();

        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))?
            .map_err(LoadError::from)?;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected frontmatter starting with '---'",
            )
            .into());
        }

        // Collect lines until the closing '---'
        let frontmatter = lines
            .by_ref()
            .map_while(|line| match line {
                Ok(content) if content.trim() == "---" => None,
                Ok(content) => Some(Ok(content)),
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let content = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

        let front: FrontMatter = serde_yaml::from_str(&frontmatter)?;
        let (id, title, body) = parse_content(&content)?;

        Ok(Self {
            frontmatter: front,
            id,
            title,
            body,
        })
    }

    /// Writes the document to a file path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, file_path: &Path) -> io::Result<()> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)
    }

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(file_path: &Path) -> Result<Self, LoadError> {
        let file = File::open(file_path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }
}

/// Parses markdown content into id, title, and body.
///
/// The id must be the first token of the first heading; the title is the
/// rest of that heading and the body is everything after it.
fn parse_content(content: &str) -> Result<(DocId, String, String), LoadError> {
    let (heading_line_idx, line) = content
        .lines()
        .enumerate()
        .find(|(_, line)| line.trim().starts_with('#'))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "No heading found in content - the document id must be in the first heading",
            )
        })?;

    let after_hashes = line.trim().trim_start_matches('#').trim();

    let first_token = after_hashes.split_whitespace().next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "No document id in heading")
    })?;

    let id = first_token.parse::<DocId>()?;

    let title = after_hashes
        .strip_prefix(first_token)
        .unwrap_or("")
        .trim()
        .to_string();

    let body = content
        .lines()
        .skip(heading_line_idx + 1)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    Ok((id, title, body))
}

/// Errors that can occur when loading a document from markdown.
#[derive(Debug, thiserror::Error)]
#[error("failed to read from markdown")]
pub enum LoadError {
    /// The document file was not found.
    NotFound,
    /// An I/O error occurred.
    Io(#[from] io::Error),
    /// The YAML frontmatter could not be parsed.
    Yaml(#[from] serde_yaml::Error),
    /// The document id could not be parsed.
    Id(#[from] doc_id::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "FrontMatterVersion")]
#[serde(into = "FrontMatterVersion")]
struct FrontMatter {
    page: Option<u32>,
    source: Option<String>,
    references: Vec<Reference>,
}

/// An outbound reference in the serialized format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
struct Reference {
    target: DocId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum FrontMatterVersion {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
}

impl From<FrontMatterVersion> for FrontMatter {
    fn from(version: FrontMatterVersion) -> Self {
        match version {
            FrontMatterVersion::V1 {
                page,
                source,
                references,
            } => Self {
                page,
                source,
                references,
            },
        }
    }
}

impl From<FrontMatter> for FrontMatterVersion {
    fn from(front_matter: FrontMatter) -> Self {
        let FrontMatter {
            page,
            source,
            references,
        } = front_matter;
        Self::V1 {
            page,
            source,
            references,
        }
    }
}
