//! Reference-graph analysis: degree rankings, isolated documents, cycles.

use serde::Serialize;
use tracing::instrument;

use crate::domain::{Catalog, DocId, Document};

/// How many entries the degree rankings keep.
const RANKING_SIZE: usize = 10;

/// A document paired with how many references point at or out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    /// The document.
    pub id: DocId,
    /// The number of references counted for the ranking.
    pub degree: usize,
}

/// A summary of the cross-reference structure of a catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Number of documents in the catalog.
    pub document_count: usize,
    /// Number of references, including broken ones.
    pub reference_count: usize,
    /// Documents most often referenced, descending.
    pub most_referenced: Vec<Ranked>,
    /// Documents making the most references, descending.
    pub most_referencing: Vec<Ranked>,
    /// Documents with no references in either direction.
    pub isolated: Vec<DocId>,
    /// Groups of documents that reference each other in a cycle.
    pub cycles: Vec<Vec<DocId>>,
}

impl Analysis {
    /// Analyses the reference structure of a catalog.
    #[instrument(skip(catalog), fields(documents = catalog.len()))]
    #[must_use]
    pub fn of(catalog: &Catalog) -> Self {
        let ids: Vec<DocId> = catalog.documents().map(Document::id).collect();

        let most_referenced = ranking(&ids, |id| catalog.referenced_by(*id).len());
        let most_referencing = ranking(&ids, |id| catalog.references_from(*id).len());

        let isolated = ids
            .iter()
            .copied()
            .filter(|id| {
                catalog.references_from(*id).is_empty() && catalog.referenced_by(*id).is_empty()
            })
            .collect();

        Self {
            document_count: catalog.len(),
            reference_count: catalog.reference_count(),
            most_referenced,
            most_referencing,
            isolated,
            cycles: catalog.cycles(),
        }
    }
}

/// Ranks ids by a degree function, descending; ties break on id so the
/// ranking is stable across runs. Zero-degree entries are omitted.
fn ranking(ids: &[DocId], degree: impl Fn(&DocId) -> usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = ids
        .iter()
        .map(|id| Ranked {
            id: *id,
            degree: degree(id),
        })
        .filter(|entry| entry.degree > 0)
        .collect();

    ranked.sort_by(|a, b| b.degree.cmp(&a.degree).then(a.id.cmp(&b.id)));
    ranked.truncate(RANKING_SIZE);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;

    fn id(s: &str) -> DocId {
        s.parse().unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        for name in ["CODE-1", "CODE-2", "CODE-12", "CODE-40", "CODE-90"] {
            catalog.insert(Document::new(id(name), format!("Law {name}")));
        }
        // 12 is the hub; 90 is isolated; 12 and 40 form a cycle.
        catalog.link(id("CODE-1"), id("CODE-2"), None).unwrap();
        catalog.link(id("CODE-1"), id("CODE-12"), None).unwrap();
        catalog.link(id("CODE-2"), id("CODE-12"), None).unwrap();
        catalog.link(id("CODE-40"), id("CODE-12"), None).unwrap();
        catalog.link(id("CODE-12"), id("CODE-40"), None).unwrap();
        catalog
    }

    #[test]
    fn counts_cover_documents_and_references() {
        let analysis = Analysis::of(&catalog());
        assert_eq!(analysis.document_count, 5);
        assert_eq!(analysis.reference_count, 5);
    }

    #[test]
    fn most_referenced_ranks_by_incoming_degree() {
        let analysis = Analysis::of(&catalog());

        assert_eq!(analysis.most_referenced[0].id, id("CODE-12"));
        assert_eq!(analysis.most_referenced[0].degree, 3);
        // Zero-degree documents never appear in the ranking.
        assert!(analysis
            .most_referenced
            .iter()
            .all(|entry| entry.id != id("CODE-90")));
    }

    #[test]
    fn most_referencing_ranks_by_outgoing_degree() {
        let analysis = Analysis::of(&catalog());
        assert_eq!(analysis.most_referencing[0].id, id("CODE-1"));
        assert_eq!(analysis.most_referencing[0].degree, 2);
    }

    #[test]
    fn isolated_documents_have_no_edges_either_way() {
        let analysis = Analysis::of(&catalog());
        assert_eq!(analysis.isolated, vec![id("CODE-90")]);
    }

    #[test]
    fn cycles_are_surfaced() {
        let analysis = Analysis::of(&catalog());
        assert_eq!(analysis.cycles, vec![vec![id("CODE-12"), id("CODE-40")]]);
    }

    #[test]
    fn empty_catalog_analyses_cleanly() {
        let analysis = Analysis::of(&Catalog::default());
        assert_eq!(analysis.document_count, 0);
        assert!(analysis.most_referenced.is_empty());
        assert!(analysis.isolated.is_empty());
        assert!(analysis.cycles.is_empty());
    }
}
