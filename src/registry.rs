//! Term classification and annotation tables.
//!
//! Built wholesale by [`TermRegistry::reload`] from four bulk queries and
//! treated as read-only between reloads. The tables sit behind one swapped
//! `Arc`, so a reader observes either the previous tables or the fully
//! rebuilt ones, never a half-built state.

use crate::binding::Row;
use crate::error::Result;
use crate::queries::{
    GET_CLASSES, GET_PROPERTIES, GET_TERM_TO_DESC, GET_TERM_TO_LABEL, PreparedQueries,
};
use crate::store::GraphStore;
use crate::term::{Term, make_term};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

const HTTP_SCHEME: &str = "http://";
const ROUTE_PREFIX: &str = "/schema";

#[derive(Debug, Default)]
struct Tables {
    classes: HashSet<Term>,
    properties: HashSet<Term>,
    labels: HashMap<Term, String>,
    descriptions: HashMap<Term, String>,
}

/// Classification sets and label/description maps for the loaded graph.
pub struct TermRegistry {
    store: Arc<GraphStore>,
    queries: Arc<PreparedQueries>,
    tables: RwLock<Arc<Tables>>,
}

impl TermRegistry {
    pub(crate) fn new(store: Arc<GraphStore>, queries: Arc<PreparedQueries>) -> Self {
        Self {
            store,
            queries,
            tables: RwLock::new(Arc::new(Tables::default())),
        }
    }

    /// Rebuilds classes, properties, labels, and descriptions from the
    /// graph and swaps them in atomically.
    ///
    /// When a term carries several labels or descriptions, the last row
    /// the query yields wins.
    pub fn reload(&self) -> Result<()> {
        let mut tables = Tables::default();

        for solution in self.queries.execute(&self.store, GET_CLASSES)? {
            tables.classes.insert(Row::new(&solution).term("class")?);
        }
        for solution in self.queries.execute(&self.store, GET_PROPERTIES)? {
            tables
                .properties
                .insert(Row::new(&solution).term("property")?);
        }
        for solution in self.queries.execute(&self.store, GET_TERM_TO_LABEL)? {
            let row = Row::new(&solution);
            tables
                .labels
                .insert(row.term("term")?, row.term("label")?.as_str().to_owned());
        }
        for solution in self.queries.execute(&self.store, GET_TERM_TO_DESC)? {
            let row = Row::new(&solution);
            tables
                .descriptions
                .insert(row.term("term")?, row.term("desc")?.as_str().to_owned());
        }

        info!(
            classes = tables.classes.len(),
            properties = tables.properties.len(),
            "term tables reloaded"
        );
        *self.tables.write() = Arc::new(tables);
        Ok(())
    }

    fn snapshot(&self) -> Arc<Tables> {
        Arc::clone(&self.tables.read())
    }

    pub fn is_class(&self, term: impl Into<Term>) -> bool {
        self.snapshot().classes.contains(&make_term(term))
    }

    pub fn is_property(&self, term: impl Into<Term>) -> bool {
        self.snapshot().properties.contains(&make_term(term))
    }

    /// A term is known iff it is classified as a class or a property.
    pub fn is_known_term(&self, term: impl Into<Term>) -> bool {
        let term = make_term(term);
        let tables = self.snapshot();
        tables.classes.contains(&term) || tables.properties.contains(&term)
    }

    /// The term's label, falling back to its canonical string form.
    pub fn label(&self, term: impl Into<Term>) -> String {
        let term = make_term(term);
        self.snapshot()
            .labels
            .get(&term)
            .cloned()
            .unwrap_or_else(|| term.as_str().to_owned())
    }

    /// The term's description, falling back to its canonical string form.
    pub fn description(&self, term: impl Into<Term>) -> String {
        let term = make_term(term);
        self.snapshot()
            .descriptions
            .get(&term)
            .cloned()
            .unwrap_or_else(|| term.as_str().to_owned())
    }

    /// URL-safe relative path for a known term; unknown terms pass through
    /// as their raw string form. Never fails.
    pub fn route_path(&self, term: impl Into<Term>) -> String {
        let term = make_term(term);
        let tables = self.snapshot();
        if !tables.classes.contains(&term) && !tables.properties.contains(&term) {
            return term.as_str().to_owned();
        }
        let rest = term.as_str().strip_prefix(HTTP_SCHEME).unwrap_or(term.as_str());
        format!("{ROUTE_PREFIX}/{rest}")
    }

    /// All classified classes, sorted by term string.
    pub fn classes(&self) -> Vec<Term> {
        let mut classes: Vec<_> = self.snapshot().classes.iter().cloned().collect();
        classes.sort();
        classes
    }

    /// All classified properties, sorted by term string.
    pub fn properties(&self) -> Vec<Term> {
        let mut properties: Vec<_> = self.snapshot().properties.iter().cloned().collect();
        properties.sort();
        properties
    }

    pub fn class_count(&self) -> usize {
        self.snapshot().classes.len()
    }

    pub fn property_count(&self) -> usize {
        self.snapshot().properties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::register_builtin;
    use oxigraph::io::RdfFormat;

    const DOC: &str = r#"
        @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix schema: <http://schema.org/> .

        schema:Book a rdfs:Class ;
            rdfs:label "Book" ;
            rdfs:comment "A written work." .
        schema:author a rdf:Property ;
            rdfs:label "author" .
    "#;

    fn registry() -> TermRegistry {
        let store = Arc::new(GraphStore::new().unwrap());
        store
            .load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())
            .unwrap();
        let queries = Arc::new(PreparedQueries::new());
        register_builtin(&queries).unwrap();
        let registry = TermRegistry::new(store, queries);
        registry.reload().unwrap();
        registry
    }

    #[test]
    fn classifies_classes_and_properties() {
        let registry = registry();
        assert!(registry.is_class("http://schema.org/Book"));
        assert!(!registry.is_property("http://schema.org/Book"));
        assert!(registry.is_property("http://schema.org/author"));
        assert!(registry.is_known_term("http://schema.org/author"));
        assert!(!registry.is_known_term("http://schema.org/Ghost"));
    }

    #[test]
    fn labels_fall_back_to_the_term_itself() {
        let registry = registry();
        assert_eq!(registry.label("http://schema.org/Book"), "Book");
        assert_eq!(registry.description("http://schema.org/Book"), "A written work.");
        assert_eq!(
            registry.label("http://schema.org/Ghost"),
            "http://schema.org/Ghost"
        );
        assert_eq!(registry.label(Term::literal("loose text")), "loose text");
    }

    #[test]
    fn route_paths_strip_the_scheme_for_known_terms() {
        let registry = registry();
        assert_eq!(
            registry.route_path("http://schema.org/Book"),
            "/schema/schema.org/Book"
        );
        assert_eq!(
            registry.route_path("http://schema.org/Ghost"),
            "http://schema.org/Ghost"
        );
    }

    #[test]
    fn reload_is_deterministic() {
        let registry = registry();
        let classes = registry.classes();
        let properties = registry.properties();
        registry.reload().unwrap();
        assert_eq!(registry.classes(), classes);
        assert_eq!(registry.properties(), properties);
        assert_eq!(registry.label("http://schema.org/Book"), "Book");
    }
}
