//! The engine facade.
//!
//! Owns the shared store, the prepared-query registry (built-in templates
//! registered at construction), the term registry, and the two resolvers.
//! This is the read surface handed to presentation and search: no
//! mutation beyond document loading and `reload` is exposed.

use crate::config::EngineConfig;
use crate::consistency::ConsistencyChecker;
use crate::domain_range::DomainRangeResolver;
use crate::error::Result;
use crate::hierarchy::HierarchyResolver;
use crate::queries::{PreparedQueries, register_builtin};
use crate::registry::TermRegistry;
use crate::store::GraphStore;
use crate::term::{Fact, Term};
use indexmap::IndexMap;
use oxigraph::io::RdfFormat;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaEngine {
    store: Arc<GraphStore>,
    queries: Arc<PreparedQueries>,
    registry: TermRegistry,
    hierarchy: HierarchyResolver,
    domain_range: DomainRangeResolver,
}

impl SchemaEngine {
    /// An engine over an empty graph, with the built-in query templates
    /// registered.
    pub fn new() -> Result<Self> {
        let store = Arc::new(GraphStore::new()?);
        let queries = Arc::new(PreparedQueries::new());
        register_builtin(&queries)?;
        let registry = TermRegistry::new(Arc::clone(&store), Arc::clone(&queries));
        let hierarchy = HierarchyResolver::new(Arc::clone(&store), Arc::clone(&queries));
        let domain_range = DomainRangeResolver::new(Arc::clone(&store), Arc::clone(&queries));
        Ok(Self {
            store,
            queries,
            registry,
            hierarchy,
            domain_range,
        })
    }

    /// Scans the configured directories, loads every supported document,
    /// rebuilds the term tables, and (when configured) runs the
    /// consistency suite, logging violations and continuing. Treating a
    /// failed suite as fatal is left to the caller.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let engine = Self::new()?;
        let mut loaded = 0;
        for dir in &config.document_dirs {
            loaded += engine.store.load_dir(dir)?;
        }
        engine.reload()?;
        info!(documents = loaded, "schema engine loaded");

        if config.validate_on_load {
            let report = engine.consistency().check_all()?;
            if report.passed() {
                info!("ontology consistency checks passed");
            } else {
                warn!(
                    violations = report.violation_count(),
                    "ontology consistency checks failed"
                );
                for violation in report.violations() {
                    warn!("{violation}");
                }
            }
        }
        Ok(engine)
    }

    /// Loads one document; `Ok(false)` means the path was already loaded
    /// and was skipped. The term tables are not rebuilt until
    /// [`reload`](Self::reload).
    pub fn add_document(&self, path: impl AsRef<Path>) -> Result<bool> {
        self.store.load_path(path)
    }

    /// Loads a Turtle document from memory under a source name.
    pub fn load_turtle(&self, source: &str, text: &str) -> Result<bool> {
        self.store
            .load_reader(source, RdfFormat::Turtle, text.as_bytes())
    }

    /// Rebuilds the classification and annotation tables from the graph.
    pub fn reload(&self) -> Result<()> {
        self.registry.reload()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn queries(&self) -> &PreparedQueries {
        &self.queries
    }

    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    pub fn is_class(&self, term: impl Into<Term>) -> bool {
        self.registry.is_class(term)
    }

    pub fn is_property(&self, term: impl Into<Term>) -> bool {
        self.registry.is_property(term)
    }

    pub fn is_known_term(&self, term: impl Into<Term>) -> bool {
        self.registry.is_known_term(term)
    }

    pub fn label(&self, term: impl Into<Term>) -> String {
        self.registry.label(term)
    }

    pub fn description(&self, term: impl Into<Term>) -> String {
        self.registry.description(term)
    }

    pub fn route_path(&self, term: impl Into<Term>) -> String {
        self.registry.route_path(term)
    }

    pub fn ancestors(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        self.hierarchy.ancestors(subject)
    }

    pub fn ancestors_prepared(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        self.hierarchy.ancestors_prepared(subject)
    }

    pub fn descendants(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        self.hierarchy.descendants(subject)
    }

    pub fn properties_with_domain(
        &self,
        class: impl Into<Term>,
    ) -> Result<IndexMap<Term, Vec<Term>>> {
        self.domain_range.properties_with_domain(class)
    }

    pub fn properties_with_range(
        &self,
        class: impl Into<Term>,
    ) -> Result<IndexMap<Term, Vec<Term>>> {
        self.domain_range.properties_with_range(class)
    }

    pub fn is_domain_predicate(&self, predicate: impl Into<Term>) -> bool {
        self.domain_range.is_domain_predicate(predicate)
    }

    pub fn is_range_predicate(&self, predicate: impl Into<Term>) -> bool {
        self.domain_range.is_range_predicate(predicate)
    }

    pub fn predicates_and_objects(&self, subject: impl Into<Term>) -> Result<Vec<(Term, Term)>> {
        self.domain_range.predicates_and_objects(subject)
    }

    /// Raw fact iterator over the graph; `None` is a wildcard.
    pub fn facts(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Fact>> {
        self.store.match_pattern(subject, predicate, object)
    }

    /// A checker bound to this engine's store and classification tables.
    pub fn consistency(&self) -> ConsistencyChecker<'_> {
        ConsistencyChecker::new(&self.store, &self.registry)
    }
}
