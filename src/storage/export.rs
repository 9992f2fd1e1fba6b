//! Tabular and seed exports of a catalog.
//!
//! Three formats cover the downstream consumers: CSV tables for
//! spreadsheets, a JSON navigation index for viewers, and a SQL seed script
//! for loading the catalog into a relational store.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    domain::{Catalog, DocId, Document},
    extract::{categorise, CategoryName},
};

/// An export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// CSV tables of documents and references.
    Csv,
    /// The JSON navigation index.
    Json,
    /// The SQL seed script.
    Sql,
}

/// Writes every export format into `dir`, returning the created paths.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_all(catalog: &Catalog, dir: &Path) -> io::Result<Vec<PathBuf>> {
    export(catalog, dir, None)
}

/// Writes one export format into `dir`, or all of them when `format` is
/// `None`, returning the created paths.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
#[instrument(skip(catalog), fields(documents = catalog.len()))]
pub fn export(catalog: &Catalog, dir: &Path, format: Option<Format>) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let targets: [(Format, &str, Writer); 4] = [
        (Format::Csv, "documents.csv", write_documents_csv as Writer),
        (Format::Csv, "references.csv", write_references_csv),
        (Format::Json, "navigation.json", write_navigation_json),
        (Format::Sql, "seed.sql", write_seed_sql_now),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (target_format, name, write) in targets {
        if format.is_some_and(|wanted| wanted != target_format) {
            continue;
        }
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path)?;
        write(catalog, &mut file)?;
        written.push(path);
    }

    info!(count = written.len(), dir = %dir.display(), "export complete");
    Ok(written)
}

type Writer = fn(&Catalog, &mut dyn Write) -> io::Result<()>;

/// Writes the document table: one row per document with its references in
/// both directions.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_documents_csv(catalog: &Catalog, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "id,title,page,source,references,referenced_by")?;

    for document in catalog.documents() {
        let id = document.id();
        let references = join_ids(catalog.references_from(id).iter().map(|r| r.to));
        let referenced_by = join_ids(catalog.referenced_by(id).into_iter());

        writeln!(
            writer,
            "{},{},{},{},{},{}",
            csv_field(&id.to_string()),
            csv_field(document.title()),
            document.page().map(|p| p.to_string()).unwrap_or_default(),
            csv_field(document.source().unwrap_or_default()),
            csv_field(&references),
            csv_field(&referenced_by),
        )?;
    }

    Ok(())
}

/// Writes the reference table: one row per edge, with its context.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_references_csv(catalog: &Catalog, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "source,target,context")?;

    for reference in catalog.references() {
        writeln!(
            writer,
            "{},{},{}",
            csv_field(&reference.from.to_string()),
            csv_field(&reference.to.to_string()),
            csv_field(reference.context.as_deref().unwrap_or_default()),
        )?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct NavigationIndex {
    documents: BTreeMap<DocId, NavigationEntry>,
    categories: BTreeMap<CategoryName, Vec<DocId>>,
}

#[derive(Debug, Serialize)]
struct NavigationEntry {
    id: DocId,
    title: String,
    references: Vec<DocId>,
    referenced_by: Vec<DocId>,
}

/// Writes the JSON navigation index consumed by viewers.
///
/// # Errors
///
/// Returns an error if serialization or the writer fails.
pub fn write_navigation_json(catalog: &Catalog, writer: &mut dyn Write) -> io::Result<()> {
    let documents = catalog
        .documents()
        .map(|document| {
            let id = document.id();
            (
                id,
                NavigationEntry {
                    id,
                    title: document.title().to_string(),
                    references: catalog.references_from(id).iter().map(|r| r.to).collect(),
                    referenced_by: catalog.referenced_by(id),
                },
            )
        })
        .collect();

    let index = NavigationIndex {
        documents,
        categories: categorise(catalog.documents()),
    };

    serde_json::to_writer_pretty(&mut *writer, &index)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer)
}

fn write_seed_sql_now(catalog: &Catalog, writer: &mut dyn Write) -> io::Result<()> {
    write_seed_sql(catalog, Utc::now(), writer)
}

/// Writes a SQL seed script inserting categories, articles, per-article
/// metadata, and references.
///
/// Numeric row ids are assigned from the catalog order, so the script is
/// deterministic for a given catalog.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_seed_sql(
    catalog: &Catalog,
    generated: DateTime<Utc>,
    writer: &mut dyn Write,
) -> io::Result<()> {
    writeln!(writer, "-- Law library seed data")?;
    writeln!(writer, "-- Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;

    let groups = categorise(catalog.documents());
    let category_ids: BTreeMap<&CategoryName, usize> = groups
        .keys()
        .enumerate()
        .map(|(index, name)| (name, index + 1))
        .collect();
    let row_ids: BTreeMap<DocId, usize> = catalog
        .documents()
        .enumerate()
        .map(|(index, document)| (document.id(), index + 1))
        .collect();

    writeln!(writer, "\n-- Categories")?;
    for (name, id) in &category_ids {
        writeln!(
            writer,
            "INSERT INTO categories (id, name) VALUES ({id}, '{}');",
            sql_escape(name.as_str())
        )?;
    }

    writeln!(writer, "\n-- Articles")?;
    for document in catalog.documents() {
        let id = document.id();
        let category = groups
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map_or(1, |(name, _)| category_ids[name]);

        writeln!(
            writer,
            "INSERT INTO articles (id, article_id, title, content, source_file, category_id) \
             VALUES ({}, '{id}', '{}', '{}', '{}', {category});",
            row_ids[&id],
            sql_escape(document.title()),
            sql_escape(document.content().unwrap_or_default()),
            sql_escape(document.source().unwrap_or_default()),
        )?;
    }

    writeln!(writer, "\n-- Article metadata")?;
    for document in catalog.documents() {
        let id = document.id();
        writeln!(
            writer,
            "INSERT INTO article_metadata (article_id, word_count, reference_count, \
             citation_count) VALUES ({}, {}, {}, {});",
            row_ids[&id],
            document.word_count(),
            catalog.references_from(id).len(),
            catalog.referenced_by(id).len(),
        )?;
    }

    writeln!(writer, "\n-- References")?;
    for reference in catalog.references() {
        // Rows exist only for documents in the catalog; broken references
        // have no target row and are left out of the seed.
        let (Some(source), Some(target)) = (row_ids.get(&reference.from), row_ids.get(&reference.to))
        else {
            continue;
        };
        writeln!(
            writer,
            "INSERT INTO article_references (source_article_id, target_article_id) \
             VALUES ({source}, {target});",
        )?;
    }

    Ok(())
}

fn join_ids(ids: impl Iterator<Item = DocId>) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join(";")
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn id(s: &str) -> DocId {
        s.parse().unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert(
            Document::new(id("CODE-1"), "LOI 1 - LE JEU".into())
                .with_page(5)
                .with_content("It's a partnership game.".into())
                .with_source("code2017.txt".into()),
        );
        catalog.insert(Document::new(id("CODE-40"), "LOI 40 - ENTAME".into()));
        catalog
            .link(id("CODE-40"), id("CODE-1"), Some("see lead, then play".into()))
            .unwrap();
        catalog
    }

    #[test]
    fn documents_csv_lists_both_reference_directions() {
        let mut buffer = Vec::new();
        write_documents_csv(&catalog(), &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "id,title,page,source,references,referenced_by");
        assert_eq!(lines[1], "CODE-1,LOI 1 - LE JEU,5,code2017.txt,,CODE-40");
        assert_eq!(lines[2], "CODE-40,LOI 40 - ENTAME,,,CODE-1,");
    }

    #[test]
    fn csv_fields_with_commas_are_quoted() {
        let mut buffer = Vec::new();
        write_references_csv(&catalog(), &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("CODE-40,CODE-1,\"see lead, then play\""));
    }

    #[test]
    fn csv_quotes_are_doubled() {
        assert_eq!(csv_field("say \"alert\""), "\"say \"\"alert\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn navigation_json_contains_documents_and_categories() {
        let mut buffer = Vec::new();
        write_navigation_json(&catalog(), &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["documents"]["CODE-40"]["references"][0], "CODE-1");
        assert_eq!(value["documents"]["CODE-1"]["referenced_by"][0], "CODE-40");
        assert_eq!(value["categories"]["LE JEU"][0], "CODE-1");
    }

    #[test]
    fn seed_sql_assigns_deterministic_row_ids() {
        let generated = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        let mut buffer = Vec::new();
        write_seed_sql(&catalog(), generated, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("-- Generated: 2026-08-28 12:00:00"));
        assert!(output.contains(
            "INSERT INTO articles (id, article_id, title, content, source_file, category_id) \
             VALUES (1, 'CODE-1',"
        ));
        // CODE-40 references CODE-1: row 2 -> row 1.
        assert!(output.contains(
            "INSERT INTO article_references (source_article_id, target_article_id) VALUES (2, 1);"
        ));
    }

    #[test]
    fn seed_sql_escapes_single_quotes() {
        let generated = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        let mut buffer = Vec::new();
        write_seed_sql(&catalog(), generated, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("It''s a partnership game."));
    }

    #[test]
    fn seed_sql_skips_broken_references() {
        let mut catalog = catalog();
        catalog
            .add_reference(id("CODE-1"), id("CODE-999"), None)
            .unwrap();

        let generated = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        let mut buffer = Vec::new();
        write_seed_sql(&catalog, generated, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(!output.contains("CODE-999"));
    }

    #[test]
    fn export_can_be_limited_to_one_format() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("export");

        let written = export(&catalog(), &out, Some(Format::Sql)).unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("seed.sql"));
    }

    #[test]
    fn export_all_creates_every_format() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("export");

        let written = export_all(&catalog(), &out).unwrap();

        assert_eq!(written.len(), 4);
        for path in written {
            assert!(path.exists(), "{} missing", path.display());
        }
    }
}
