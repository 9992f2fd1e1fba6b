use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use lawbook::{storage::export, Library};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Sql,
}

impl From<Format> for export::Format {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Sql => Self::Sql,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Export the library as CSV, JSON and SQL")]
pub struct Export {
    /// Export only one format instead of all of them
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// The directory to write the export files into
    #[arg(long, default_value = "./export")]
    out: PathBuf,
}

impl Export {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        let written = export::export(
            library.catalog(),
            &self.out,
            self.format.map(export::Format::from),
        )?;

        for path in &written {
            println!("{}", path.display());
        }
        println!("{}", format!("Exported {} files", written.len()).success());

        Ok(())
    }
}
