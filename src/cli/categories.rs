use std::path::Path;

use clap::{Parser, ValueEnum};
use lawbook::{extract::categorise, Library};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Group articles by the category in their title")]
pub struct Categories {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl Categories {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        let groups = categorise(library.catalog().documents());

        match self.format {
            Format::Table => {
                for (category, ids) in &groups {
                    println!(
                        "{} {}",
                        category.to_string().success(),
                        format!("({})", ids.len()).dim()
                    );
                    for id in ids {
                        println!("  {id}");
                    }
                }
                println!("\n{} categories", groups.len());
            }
            Format::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        }

        Ok(())
    }
}
