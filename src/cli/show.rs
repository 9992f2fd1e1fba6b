use std::path::Path;

use clap::{Parser, ValueEnum};
use lawbook::{storage::markdown::MarkdownDocument, DocId, Library, Resolved};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Pretty,
    Json,
    Markdown,
    Raw,
}

#[derive(Debug, Parser)]
#[command(about = "Show one article with its references")]
pub struct Show {
    /// The article to show, e.g. CODE-40 or rnc-12.1
    #[arg(value_parser = super::parse_doc_id)]
    id: DocId,

    /// Output format
    #[arg(long, value_enum, default_value_t = Output::Pretty)]
    output: Output,

    /// Include the article body
    #[arg(long)]
    with_content: bool,
}

impl Show {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;

        let Resolved::Found {
            document,
            references,
        } = library.resolve(self.id)
        else {
            eprintln!("{} not found", self.id);
            std::process::exit(1);
        };

        match self.output {
            Output::Pretty => {
                println!("{} {}", document.id().to_string().success(), document.title());
                if let Some(page) = document.page() {
                    println!("{} {page}", "page".dim());
                }
                if let Some(source) = document.source() {
                    println!("{} {source}", "source".dim());
                }

                if !references.is_empty() {
                    println!("\n{}", "References".dim());
                    for reference in &references {
                        match &reference.context {
                            Some(context) => println!("  {}  {context}", reference.to),
                            None => println!("  {}", reference.to),
                        }
                    }
                }

                let incoming = library.catalog().referenced_by(self.id);
                if !incoming.is_empty() {
                    println!("\n{}", "Referenced by".dim());
                    for id in incoming {
                        println!("  {id}");
                    }
                }

                if self.with_content {
                    if let Some(content) = document.content() {
                        println!("\n{content}");
                    }
                }
            }
            Output::Json => {
                let view = View {
                    id: document.id().to_string(),
                    title: document.title().to_string(),
                    page: document.page(),
                    source: document.source().map(ToString::to_string),
                    content: self
                        .with_content
                        .then(|| document.content().map(ToString::to_string))
                        .flatten(),
                    references: references
                        .iter()
                        .map(|reference| reference.to.to_string())
                        .collect(),
                    referenced_by: library
                        .catalog()
                        .referenced_by(self.id)
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            Output::Markdown => {
                let markdown = MarkdownDocument::new(document, &references);
                markdown.write(&mut std::io::stdout().lock())?;
            }
            Output::Raw => {
                if let Some(content) = document.content() {
                    println!("{content}");
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
struct View {
    id: String,
    title: String,
    page: Option<u32>,
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    references: Vec<String>,
    referenced_by: Vec<String>,
}
