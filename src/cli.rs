use std::path::{Path, PathBuf};

mod analyze;
mod browse;
mod categories;
mod export;
mod extract;
mod list;
mod show;
mod terminal;
mod validate;

use analyze::Analyze;
use browse::Browse;
use categories::Categories;
use clap::ArgAction;
use export::Export;
use extract::Extract;
use lawbook::{storage::METADATA_DIR, Config, DocId, Hierarchy};
use list::List;
use show::Show;
use tracing::instrument;
use validate::Validate;

/// Parse a document id from a string, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts lowercase input
/// and normalizes it before parsing.
fn parse_doc_id(s: &str) -> Result<DocId, String> {
    let uppercase = s.to_uppercase();
    uppercase.parse().map_err(|e| format!("{e}"))
}

/// Parse a hierarchy name, normalizing to uppercase.
fn parse_hierarchy(s: &str) -> Result<Hierarchy, String> {
    let uppercase = s.to_uppercase();
    uppercase.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the law library
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new law library
    Init,

    /// Extract articles and references from raw law text
    Extract(Extract),

    /// List the articles of a hierarchy in order
    List(List),

    /// Show an article with its references
    Show(Show),

    /// List category groups and their articles
    Categories(Categories),

    /// Analyze the reference graph
    Analyze(Analyze),

    /// Validate library health (broken references, cycles)
    Validate(Validate),

    /// Export the library as CSV, JSON and SQL seed files
    Export(Export),

    /// Browse articles interactively, following references
    Browse(Browse),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Extract(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Categories(command) => command.run(root)?,
            Self::Analyze(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::Export(command) => command.run(root)?,
            Self::Browse(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let metadata_dir = root.join(METADATA_DIR);
        if metadata_dir.exists() {
            anyhow::bail!("Library already initialized (found existing {METADATA_DIR} directory)");
        }

        fs::create_dir_all(&metadata_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {METADATA_DIR} directory: {e}"))?;

        let config_path = metadata_dir.join("config.toml");
        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized law library in {}", root.display());
        println!("  Created: {METADATA_DIR}/config.toml");
        println!();
        println!("Next steps:");
        println!("  laws extract code2017.txt --hierarchy code");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lawbook::Library;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn init_creates_metadata_and_config() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Init::run(&root).expect("init should succeed");

        assert!(root.join(METADATA_DIR).join("config.toml").exists());
    }

    #[test]
    fn init_refuses_to_reinitialize() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Init::run(&root).unwrap();
        assert!(Init::run(&root).is_err());
    }

    #[test]
    fn extract_run_populates_the_library() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let input = tmp.path().join("code.txt");
        std::fs::write(
            &input,
            "LOI 1 - LE JEU\nBody, voir Loi 40.\nLOI 40 - ENTAME\nBody.\n",
        )
        .unwrap();

        let extract = Extract::new(input, Hierarchy::Code);
        extract.run(&root).expect("extract should succeed");

        let library = Library::open(&root).expect("library should open");
        assert_eq!(library.catalog().len(), 2);
        assert_eq!(
            library
                .catalog()
                .references_from(parse_doc_id("code-1").unwrap())
                .len(),
            1
        );
    }

    #[test]
    fn doc_id_parsing_is_case_insensitive_at_the_boundary() {
        assert_eq!(
            parse_doc_id("code-40b.2").unwrap(),
            parse_doc_id("CODE-40B.2").unwrap()
        );
        assert!(parse_doc_id("nope-40").is_err());
    }
}
