use std::path::Path;

use clap::{Parser, ValueEnum};
use lawbook::{analysis::Analysis, Library};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Analyse the reference graph")]
pub struct Analyze {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl Analyze {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        let analysis = Analysis::of(library.catalog());

        match self.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
            Format::Table => {
                println!(
                    "{} documents, {} references",
                    analysis.document_count, analysis.reference_count
                );

                if !analysis.most_referenced.is_empty() {
                    println!("\n{}", "Most referenced".dim());
                    for ranked in &analysis.most_referenced {
                        println!("  {:<12} {}", ranked.id.to_string(), ranked.degree);
                    }
                }

                if !analysis.most_referencing.is_empty() {
                    println!("\n{}", "Most referencing".dim());
                    for ranked in &analysis.most_referencing {
                        println!("  {:<12} {}", ranked.id.to_string(), ranked.degree);
                    }
                }

                if !analysis.isolated.is_empty() {
                    println!("\n{}", "Isolated".dim());
                    for id in &analysis.isolated {
                        println!("  {id}");
                    }
                }

                if analysis.cycles.is_empty() {
                    println!("\n{}", "No reference cycles".success());
                } else {
                    println!("\n{}", "Cycles".warning());
                    for cycle in &analysis.cycles {
                        let chain = cycle
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" -> ");
                        println!("  {chain}");
                    }
                }
            }
        }

        Ok(())
    }
}
