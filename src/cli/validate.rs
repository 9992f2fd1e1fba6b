use std::path::Path;

use clap::Parser;
use lawbook::Library;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check the library for broken references and cycles")]
pub struct Validate {
    /// Only set the exit code, print nothing
    #[arg(long)]
    quiet: bool,
}

impl Validate {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        let broken = library.catalog().broken_references();
        let cycles = library.catalog().cycles();

        if broken.is_empty() && cycles.is_empty() {
            if !self.quiet {
                println!(
                    "{}",
                    format!("{} documents, no issues", library.catalog().len()).success()
                );
            }
            return Ok(());
        }

        if !self.quiet {
            if !broken.is_empty() {
                println!("{}", "Broken references".warning());
                for reference in &broken {
                    println!("  {} -> {}", reference.from, reference.to);
                }
            }
            if !cycles.is_empty() {
                println!("{}", "Reference cycles".warning());
                for cycle in &cycles {
                    let chain = cycle
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    println!("  {chain}");
                }
            }
            println!(
                "\n{} broken references, {} cycles",
                broken.len(),
                cycles.len()
            );
        }

        // Distinct from the "not found" exit code so CI can tell them apart.
        std::process::exit(2);
    }
}
