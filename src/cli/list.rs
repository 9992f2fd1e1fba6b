use std::path::Path;

use clap::{Parser, ValueEnum};
use lawbook::{Hierarchy, Library};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "List the articles of a hierarchy in numeric order")]
pub struct List {
    /// The hierarchy to list
    #[arg(value_parser = super::parse_hierarchy)]
    hierarchy: Hierarchy,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl List {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        let documents = library.catalog().list(self.hierarchy);

        if documents.is_empty() {
            println!("{}", format!("No {} articles", self.hierarchy).warning());
            return Ok(());
        }

        match self.format {
            Format::Table => {
                println!(
                    "{:<12} {:>5} {:>5} {:>5}  {}",
                    "ID".dim(),
                    "PAGE".dim(),
                    "OUT".dim(),
                    "IN".dim(),
                    "TITLE".dim()
                );
                let width = super::terminal::terminal_width().map_or(100, usize::from);
                for document in &documents {
                    let id = document.id();
                    let page = document
                        .page()
                        .map_or_else(|| "-".to_string(), |page| page.to_string());
                    let outgoing = library.catalog().references_from(id).len();
                    let incoming = library.catalog().referenced_by(id).len();
                    let mut title = document.title().to_string();
                    // 32 columns of fixed fields before the title starts.
                    let room = width.saturating_sub(32).max(16);
                    if title.chars().count() > room {
                        title = title.chars().take(room - 1).collect();
                        title.push('…');
                    }
                    println!(
                        "{:<12} {page:>5} {outgoing:>5} {incoming:>5}  {title}",
                        id.to_string()
                    );
                }
                println!("\n{} articles", documents.len());
            }
            Format::Json => {
                let listing = documents
                    .iter()
                    .map(|document| Entry {
                        id: document.id().to_string(),
                        title: document.title().to_string(),
                        page: document.page(),
                        references: library.catalog().references_from(document.id()).len(),
                        referenced_by: library.catalog().referenced_by(document.id()).len(),
                    })
                    .collect::<Vec<_>>();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
        }

        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
struct Entry {
    id: String,
    title: String,
    page: Option<u32>,
    references: usize,
    referenced_by: usize,
}
