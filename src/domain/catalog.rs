//! In-memory catalog of documents with a cross-reference graph.
//!
//! The [`Catalog`] knows nothing about the filesystem. Documents are stored
//! in a map keyed by [`DocId`]; cross-references live in a directed graph
//! whose edges carry the optional context text.

use std::collections::BTreeMap;

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap, Direction};
use thiserror::Error;

use crate::domain::{DocId, Document, Hierarchy};

/// Data stored on each edge of the cross-reference graph.
///
/// An edge points from the referencing document to the referenced one and
/// optionally records the text surrounding the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeData {
    context: Option<String>,
}

/// A directed cross-reference between two documents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CrossReference {
    /// The referencing document.
    pub from: DocId,
    /// The referenced document.
    pub to: DocId,
    /// Explanatory text surrounding the reference, when captured.
    pub context: Option<String>,
}

/// An in-memory set of documents and the references between them.
///
/// Documents are kept in a `BTreeMap` so per-hierarchy listings come out in
/// numeric order without re-sorting. The graph is the sole source of truth
/// for references; a target may appear in the graph without a corresponding
/// document, which is how broken references are represented.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    documents: BTreeMap<DocId, Document>,
    graph: DiGraphMap<DocId, EdgeData>,
}

/// Errors that can occur when linking documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The referencing document could not be found.
    #[error("source document {0} not found")]
    SourceNotFound(DocId),
    /// The referenced document could not be found.
    #[error("target document {0} not found")]
    TargetNotFound(DocId),
    /// A document may not reference itself.
    #[error("document {0} cannot reference itself")]
    SelfReference(DocId),
}

/// Result of linking two documents together.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkOutcome {
    /// The referencing document.
    pub from: DocId,
    /// The referenced document.
    pub to: DocId,
    /// Whether the reference already existed prior to linking.
    pub already_linked: bool,
}

impl Catalog {
    /// Creates a catalog with pre-allocated capacity for the given number of
    /// documents.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: BTreeMap::new(),
            graph: DiGraphMap::with_capacity(capacity, capacity * 2),
        }
    }

    /// Inserts a document into the catalog.
    ///
    /// # Panics
    ///
    /// Panics if a document with the same id already exists.
    pub fn insert(&mut self, document: Document) {
        let id = document.id();
        assert!(
            !self.documents.contains_key(&id),
            "Duplicate document id: {id}"
        );

        // The node may already exist as the target of an earlier reference.
        self.graph.add_node(id);
        self.documents.insert(id, document);
    }

    /// Retrieves a document by id.
    #[must_use]
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Whether a document with the given id exists.
    #[must_use]
    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Number of documents in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the catalog holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates over all documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.values()
    }

    /// Returns the full ordered set of documents in one hierarchy.
    ///
    /// The order is ascending by article number (numeric, not lexical), and
    /// the result is identical across repeated calls on an unchanged catalog.
    #[must_use]
    pub fn list(&self, hierarchy: Hierarchy) -> Vec<&Document> {
        // DocId orders by (hierarchy, number), so a range over the BTreeMap
        // already yields numeric order within the hierarchy.
        self.documents
            .values()
            .filter(|doc| doc.hierarchy() == hierarchy)
            .collect()
    }

    /// Records a cross-reference from `from` to `to`.
    ///
    /// The source document must exist; the target may not, in which case the
    /// edge is kept and later reported by [`Self::broken_references`]. Use
    /// [`Self::link`] when both ends are required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::SourceNotFound`] when the source document is
    /// absent, or [`LinkError::SelfReference`] when `from == to`.
    pub fn add_reference(
        &mut self,
        from: DocId,
        to: DocId,
        context: Option<String>,
    ) -> Result<LinkOutcome, LinkError> {
        if !self.contains(from) {
            return Err(LinkError::SourceNotFound(from));
        }
        if from == to {
            return Err(LinkError::SelfReference(from));
        }

        let already_linked = self.graph.contains_edge(from, to);
        self.graph.add_edge(from, to, EdgeData { context });

        Ok(LinkOutcome {
            from,
            to,
            already_linked,
        })
    }

    /// Links two documents, requiring both to exist.
    ///
    /// Relinking an existing reference replaces its context and reports
    /// `already_linked`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::SourceNotFound`] or [`LinkError::TargetNotFound`]
    /// when either end is absent, or [`LinkError::SelfReference`] when the
    /// two ids are equal.
    pub fn link(
        &mut self,
        from: DocId,
        to: DocId,
        context: Option<String>,
    ) -> Result<LinkOutcome, LinkError> {
        if !self.contains(to) {
            return Err(LinkError::TargetNotFound(to));
        }
        self.add_reference(from, to, context)
    }

    /// Removes a cross-reference. Returns `true` if the edge existed.
    pub fn unlink(&mut self, from: DocId, to: DocId) -> bool {
        self.graph.remove_edge(from, to).is_some()
    }

    /// All outbound references of a document, ascending by target id.
    ///
    /// The order is fixed by the catalog rather than inherited from
    /// insertion, so re-resolving a document always yields the same sequence.
    #[must_use]
    pub fn references_from(&self, id: DocId) -> Vec<CrossReference> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }

        let mut references: Vec<CrossReference> = self
            .graph
            .edges(id)
            .map(|(from, to, data)| CrossReference {
                from,
                to,
                context: data.context.clone(),
            })
            .collect();
        references.sort_by_key(|reference| reference.to);
        references
    }

    /// Ids of documents that reference the given one, ascending.
    #[must_use]
    pub fn referenced_by(&self, id: DocId) -> Vec<DocId> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }

        let mut sources: Vec<DocId> = self
            .graph
            .neighbors_directed(id, Direction::Incoming)
            .collect();
        sources.sort_unstable();
        sources
    }

    /// References whose target has no document in the catalog.
    ///
    /// Following such a reference degenerates to a not-found view; they are
    /// surfaced here so `laws validate` can report them.
    #[must_use]
    pub fn broken_references(&self) -> Vec<CrossReference> {
        let mut broken: Vec<CrossReference> = self
            .graph
            .all_edges()
            .filter(|(_, to, _)| !self.documents.contains_key(to))
            .map(|(from, to, data)| CrossReference {
                from,
                to,
                context: data.context.clone(),
            })
            .collect();
        broken.sort_by_key(|reference| (reference.from, reference.to));
        broken
    }

    /// Total number of cross-references, including broken ones.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over every cross-reference, ascending by (source, target).
    #[must_use]
    pub fn references(&self) -> Vec<CrossReference> {
        let mut references: Vec<CrossReference> = self
            .graph
            .all_edges()
            .map(|(from, to, data)| CrossReference {
                from,
                to,
                context: data.context.clone(),
            })
            .collect();
        references.sort_by_key(|reference| (reference.from, reference.to));
        references
    }

    /// Returns all circular reference groups as sorted sets of ids.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<DocId>> {
        let mut cycles = Vec::new();

        for component in tarjan_scc(&self.graph) {
            if component.len() > 1 {
                let mut ids = component;
                ids.sort_unstable();
                cycles.push(ids);
            }
        }

        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document::new(id.parse().unwrap(), format!("Law {id}"))
    }

    fn id(s: &str) -> DocId {
        s.parse().unwrap()
    }

    fn seeded() -> Catalog {
        let mut catalog = Catalog::default();
        for name in ["CODE-1", "CODE-2", "CODE-40", "RNC-1"] {
            catalog.insert(doc(name));
        }
        catalog
    }

    #[test]
    fn list_is_numeric_and_idempotent() {
        let mut catalog = Catalog::default();
        for name in ["CODE-400", "CODE-7", "CODE-40", "RNC-3"] {
            catalog.insert(doc(name));
        }

        let first: Vec<String> = catalog
            .list(Hierarchy::Code)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(first, ["CODE-7", "CODE-40", "CODE-400"]);

        let second: Vec<String> = catalog
            .list(Hierarchy::Code)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn documents_without_references_have_empty_outbound_set() {
        let catalog = seeded();
        assert!(catalog.references_from(id("CODE-2")).is_empty());
    }

    #[test]
    fn link_records_reference_with_context() {
        let mut catalog = seeded();
        let outcome = catalog
            .link(id("CODE-40"), id("CODE-1"), Some("see opening lead".into()))
            .unwrap();
        assert!(!outcome.already_linked);

        let references = catalog.references_from(id("CODE-40"));
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].to, id("CODE-1"));
        assert_eq!(references[0].context.as_deref(), Some("see opening lead"));
    }

    #[test]
    fn relinking_reports_already_linked() {
        let mut catalog = seeded();
        catalog.link(id("CODE-40"), id("CODE-1"), None).unwrap();
        let outcome = catalog
            .link(id("CODE-40"), id("CODE-1"), Some("updated".into()))
            .unwrap();
        assert!(outcome.already_linked);

        // Context is refreshed, not duplicated.
        let references = catalog.references_from(id("CODE-40"));
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].context.as_deref(), Some("updated"));
    }

    #[test]
    fn link_rejects_missing_endpoints() {
        let mut catalog = seeded();
        assert_eq!(
            catalog.link(id("CODE-99"), id("CODE-1"), None),
            Err(LinkError::SourceNotFound(id("CODE-99")))
        );
        assert_eq!(
            catalog.link(id("CODE-40"), id("CODE-99"), None),
            Err(LinkError::TargetNotFound(id("CODE-99")))
        );
    }

    #[test]
    fn link_rejects_self_reference() {
        let mut catalog = seeded();
        assert_eq!(
            catalog.link(id("CODE-40"), id("CODE-40"), None),
            Err(LinkError::SelfReference(id("CODE-40")))
        );
    }

    #[test]
    fn references_are_ordered_by_target() {
        let mut catalog = seeded();
        catalog.link(id("CODE-40"), id("CODE-2"), None).unwrap();
        catalog.link(id("CODE-40"), id("CODE-1"), None).unwrap();
        catalog.link(id("CODE-40"), id("RNC-1"), None).unwrap();

        let targets: Vec<String> = catalog
            .references_from(id("CODE-40"))
            .iter()
            .map(|r| r.to.to_string())
            .collect();
        assert_eq!(targets, ["CODE-1", "CODE-2", "RNC-1"]);
    }

    #[test]
    fn referenced_by_is_the_inverse_view() {
        let mut catalog = seeded();
        catalog.link(id("CODE-40"), id("CODE-1"), None).unwrap();
        catalog.link(id("CODE-2"), id("CODE-1"), None).unwrap();

        assert_eq!(
            catalog.referenced_by(id("CODE-1")),
            vec![id("CODE-2"), id("CODE-40")]
        );
        assert!(catalog.referenced_by(id("CODE-2")).is_empty());
    }

    #[test]
    fn dangling_target_is_reported_as_broken() {
        let mut catalog = seeded();
        catalog
            .add_reference(id("CODE-40"), id("CODE-99"), None)
            .unwrap();

        let broken = catalog.broken_references();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].from, id("CODE-40"));
        assert_eq!(broken[0].to, id("CODE-99"));

        // The dangling target is still listed among outbound references.
        assert_eq!(catalog.references_from(id("CODE-40")).len(), 1);
    }

    #[test]
    fn cycles_reports_strongly_connected_groups() {
        let mut catalog = seeded();
        catalog.link(id("CODE-1"), id("CODE-2"), None).unwrap();
        catalog.link(id("CODE-2"), id("CODE-40"), None).unwrap();
        catalog.link(id("CODE-40"), id("CODE-1"), None).unwrap();
        catalog.link(id("CODE-2"), id("RNC-1"), None).unwrap();

        let cycles = catalog.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0],
            vec![id("CODE-1"), id("CODE-2"), id("CODE-40")]
        );
    }

    #[test]
    #[should_panic(expected = "Duplicate document id")]
    fn duplicate_insert_panics() {
        let mut catalog = seeded();
        catalog.insert(doc("CODE-1"));
    }
}
