//! Named, reusable query templates.
//!
//! Templates are compiled once when registered and reused across calls.
//! A template may carry a namespace-binding table; its entries become
//! `PREFIX` declarations ahead of the query text, so the prefix policy
//! lives in one place instead of being repeated per query.
//!
//! Bound execution substitutes variables with validated IRI nodes
//! rendered in N-Triples form. The value is typed data, never
//! caller-controlled text, which closes the injection hole that raw
//! string-interpolated templates would open.

use crate::error::{EngineError, Result};
use crate::store::GraphStore;
use crate::term::Term;
use crate::vocab;
use oxigraph::sparql::{Query, QuerySolution};
use parking_lot::RwLock;
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

pub const GET_CLASSES: &str = "get_classes";
pub const GET_PROPERTIES: &str = "get_properties";
pub const GET_TERM_TO_LABEL: &str = "get_term_to_label";
pub const GET_TERM_TO_DESC: &str = "get_term_to_desc";
pub const GET_ANCESTORS: &str = "get_ancestors";
pub const GET_DESCENDANTS: &str = "get_descendants";
pub const GET_DOMAIN_PROPERTIES: &str = "get_domain_properties";
pub const GET_RANGE_PROPERTIES: &str = "get_range_properties";
pub const GET_DESCRIBE: &str = "get_describe";

/// A compiled template held by the registry.
pub struct PreparedQuery {
    name: String,
    text: String,
    query: Query,
}

impl PreparedQuery {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full query text, prefix declarations included.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Registry of prepared queries, keyed by name. Re-adding a name
/// overwrites the previous template silently.
pub struct PreparedQueries {
    queries: RwLock<HashMap<String, Arc<PreparedQuery>>>,
}

impl PreparedQueries {
    pub fn new() -> Self {
        Self {
            queries: RwLock::new(HashMap::new()),
        }
    }

    /// Compiles `text` (with `namespaces` as PREFIX declarations) and
    /// stores it under `name`.
    pub fn add(
        &self,
        name: &str,
        text: &str,
        namespaces: &[(&str, &str)],
    ) -> Result<Arc<PreparedQuery>> {
        debug!(name, "adding prepared query");
        let mut full = String::new();
        for (prefix, iri) in namespaces {
            let _ = writeln!(full, "PREFIX {prefix}: <{iri}>");
        }
        full.push_str(text);

        let query = Query::parse(&full, None).map_err(|err| EngineError::QueryParse {
            name: name.to_owned(),
            message: err.to_string(),
        })?;
        let prepared = Arc::new(PreparedQuery {
            name: name.to_owned(),
            text: full,
            query,
        });
        self.queries
            .write()
            .insert(name.to_owned(), Arc::clone(&prepared));
        Ok(prepared)
    }

    pub fn get(&self, name: &str) -> Result<Arc<PreparedQuery>> {
        self.queries
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownQuery(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queries.read().contains_key(name)
    }

    /// Runs the precompiled query against `store` and collects its rows.
    pub fn execute(&self, store: &GraphStore, name: &str) -> Result<Vec<QuerySolution>> {
        let prepared = self.get(name)?;
        debug!(name, query = %prepared.text, "executing prepared query");
        store.select_compiled(prepared.query.clone())
    }

    /// Runs the query with each binding substituted as a validated IRI
    /// node. A binding that does not name an IRI matches nothing, so the
    /// result is empty rather than an error.
    pub fn execute_bound(
        &self,
        store: &GraphStore,
        name: &str,
        bindings: &[(&str, &Term)],
    ) -> Result<Vec<QuerySolution>> {
        let prepared = self.get(name)?;
        let mut text = prepared.text.clone();
        for (var, term) in bindings {
            let Some(node) = term.as_named_node() else {
                return Ok(Vec::new());
            };
            let pattern = Regex::new(&format!(r"\?{}\b", regex::escape(var)))
                .map_err(|_| EngineError::InvalidVariable((*var).to_owned()))?;
            text = pattern
                .replace_all(&text, NoExpand(&node.to_string()))
                .into_owned();
        }
        debug!(name, query = %text, "executing bound prepared query");
        store.select(&text)
    }
}

impl Default for PreparedQueries {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the engine's built-in templates.
pub fn register_builtin(queries: &PreparedQueries) -> Result<()> {
    let ns: &[(&str, &str)] = &[
        ("rdf", vocab::RDF_NS),
        ("rdfs", vocab::RDFS_NS),
        ("schema", vocab::SCHEMA_NS),
    ];

    queries.add(
        GET_CLASSES,
        "SELECT ?class WHERE { ?class rdf:type rdfs:Class . }",
        ns,
    )?;
    queries.add(
        GET_PROPERTIES,
        "SELECT ?property WHERE { ?property rdf:type rdf:Property . }",
        ns,
    )?;
    queries.add(
        GET_TERM_TO_LABEL,
        "SELECT ?term ?label WHERE { ?term rdfs:label ?label . }",
        ns,
    )?;
    queries.add(
        GET_TERM_TO_DESC,
        "SELECT ?term ?desc WHERE { ?term rdfs:comment ?desc . }",
        ns,
    )?;
    queries.add(
        GET_ANCESTORS,
        "SELECT ?class (COUNT(DISTINCT ?mid) AS ?paths) \
         WHERE { ?subject rdfs:subClassOf* ?mid . ?mid rdfs:subClassOf* ?class . } \
         GROUP BY ?class \
         ORDER BY ?paths ?class",
        ns,
    )?;
    queries.add(
        GET_DESCENDANTS,
        "SELECT ?class WHERE { ?class rdfs:subClassOf ?subject . } ORDER BY ?class",
        ns,
    )?;
    queries.add(
        GET_DOMAIN_PROPERTIES,
        "SELECT ?property ?object \
         WHERE { ?property schema:domainIncludes ?subject . \
                 ?property schema:rangeIncludes ?object . } \
         ORDER BY ?property",
        ns,
    )?;
    queries.add(
        GET_RANGE_PROPERTIES,
        "SELECT ?property ?object \
         WHERE { ?property schema:rangeIncludes ?subject . \
                 ?property schema:domainIncludes ?object . } \
         ORDER BY ?property",
        ns,
    )?;
    queries.add(
        GET_DESCRIBE,
        "SELECT ?predicate ?object WHERE { ?subject ?predicate ?object . } ORDER BY ?predicate",
        ns,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Row;
    use oxigraph::io::RdfFormat;

    const DOC: &str = r#"
        @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix schema: <http://schema.org/> .

        schema:Publication a rdfs:Class .
        schema:Book a rdfs:Class ;
            rdfs:subClassOf schema:Publication .
    "#;

    fn store() -> GraphStore {
        let store = GraphStore::new().unwrap();
        store
            .load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())
            .unwrap();
        store
    }

    #[test]
    fn unknown_name_is_an_error() {
        let queries = PreparedQueries::new();
        let store = GraphStore::new().unwrap();
        assert!(matches!(
            queries.execute(&store, "nope"),
            Err(EngineError::UnknownQuery(name)) if name == "nope"
        ));
    }

    #[test]
    fn bad_template_fails_at_registration() {
        let queries = PreparedQueries::new();
        assert!(matches!(
            queries.add("broken", "SELECT WHERE {", &[]),
            Err(EngineError::QueryParse { name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn readding_a_name_overwrites() -> anyhow::Result<()> {
        let queries = PreparedQueries::new();
        queries.add("q", "SELECT ?s WHERE { ?s ?p ?o . }", &[])?;
        queries.add("q", "SELECT ?p WHERE { ?s ?p ?o . }", &[])?;
        assert!(queries.get("q")?.text().contains("?p WHERE"));
        Ok(())
    }

    #[test]
    fn executes_registered_templates() -> anyhow::Result<()> {
        let store = store();
        let queries = PreparedQueries::new();
        register_builtin(&queries)?;

        let rows = queries.execute(&store, GET_CLASSES)?;
        let mut classes: Vec<String> = rows
            .iter()
            .map(|row| Ok(Row::new(row).iri("class")?.as_str().to_owned()))
            .collect::<Result<_>>()?;
        classes.sort();
        assert_eq!(
            classes,
            vec!["http://schema.org/Book", "http://schema.org/Publication"]
        );
        Ok(())
    }

    #[test]
    fn bound_execution_substitutes_the_subject() -> anyhow::Result<()> {
        let store = store();
        let queries = PreparedQueries::new();
        register_builtin(&queries)?;

        let publication = Term::iri("http://schema.org/Publication");
        let rows = queries.execute_bound(&store, GET_DESCENDANTS, &[("subject", &publication)])?;
        assert_eq!(rows.len(), 1);
        assert_eq!(
            Row::new(&rows[0]).iri("class")?,
            Term::iri("http://schema.org/Book")
        );

        // a literal binding matches nothing
        let literal = Term::literal("Publication");
        assert!(queries
            .execute_bound(&store, GET_DESCENDANTS, &[("subject", &literal)])?
            .is_empty());
        Ok(())
    }
}
