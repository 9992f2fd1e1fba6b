use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lawbook::{
    extract::{extract_articles, Detector},
    Hierarchy, Library,
};
use tracing::{instrument, warn};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Extract articles and references from raw law text")]
pub struct Extract {
    /// The raw text file to extract from (pdftotext output)
    input: PathBuf,

    /// The hierarchy the file belongs to
    #[arg(long, value_parser = super::parse_hierarchy, default_value = "CODE")]
    hierarchy: Hierarchy,
}

impl Extract {
    #[cfg(test)]
    pub const fn new(input: PathBuf, hierarchy: Hierarchy) -> Self {
        Self { input, hierarchy }
    }

    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(&self.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", self.input.display()))?;

        let mut library = Library::open(root)?;
        let detector = Detector::new(library.config());

        let source = self
            .input
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        let documents = extract_articles(&text, self.hierarchy, source.as_deref());

        if documents.is_empty() {
            anyhow::bail!("No articles found in {}", self.input.display());
        }

        let progress = ProgressBar::new(documents.len() as u64).with_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut inserted = 0_usize;
        let mut skipped = 0_usize;
        let mut references = 0_usize;

        for document in documents {
            let id = document.id();
            progress.set_message(id.to_string());

            if library.catalog().contains(id) {
                warn!(%id, "already in the library, skipping");
                skipped += 1;
                progress.inc(1);
                continue;
            }

            let detections = detector
                .detect(&document)
                .into_iter()
                .map(|detection| (detection.target, detection.context))
                .collect::<Vec<_>>();
            references += detections.len();

            library.insert(document, detections)?;
            inserted += 1;
            progress.inc(1);
        }

        progress.finish_and_clear();

        println!(
            "{}",
            format!("Extracted {inserted} articles, {references} references").success()
        );
        if skipped > 0 {
            println!(
                "{}",
                format!("Skipped {skipped} articles already in the library").warning()
            );
        }

        Ok(())
    }
}
