//! Ancestor and descendant resolution over `rdfs:subClassOf`.
//!
//! Descendants are one hop of the relation. Ancestors are the
//! reflexive-transitive closure, computed as a two-hop path through an
//! intermediate term and ordered by ascending count of distinct
//! intermediates that reach each ancestor. The count approximates
//! hierarchy distance: closer ancestors are reached through fewer
//! intermediates. It is a documented heuristic, not a shortest-path
//! guarantee under multiple inheritance.

use crate::binding::Row;
use crate::error::Result;
use crate::queries::{GET_ANCESTORS, GET_DESCENDANTS, PreparedQueries};
use crate::store::GraphStore;
use crate::term::{Term, make_term};
use crate::vocab;
use std::sync::Arc;
use tracing::debug;

/// Answers hierarchy queries against the live store; results are computed
/// on demand, never cached.
pub struct HierarchyResolver {
    store: Arc<GraphStore>,
    queries: Arc<PreparedQueries>,
}

impl HierarchyResolver {
    pub(crate) fn new(store: Arc<GraphStore>, queries: Arc<PreparedQueries>) -> Self {
        Self { store, queries }
    }

    /// Every term declared a direct subtype of `subject`, ordered by term
    /// string.
    pub fn descendants(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        let subject = make_term(subject);
        let rows = self
            .queries
            .execute_bound(&self.store, GET_DESCENDANTS, &[("subject", &subject)])?;
        rows.iter()
            .map(|solution| Ok(Row::new(solution).term("class")?))
            .collect()
    }

    /// Every transitive ancestor of `subject`, itself included, ordered by
    /// ascending intermediate count (ties broken by term string).
    ///
    /// A literal subject, or one the graph has never seen, yields an empty
    /// sequence. The explicit occurrence check matters: the zero-length
    /// path would otherwise report any IRI as its own ancestor.
    pub fn ancestors(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        let subject = make_term(subject);
        let Some(node) = subject.as_named_node() else {
            return Ok(Vec::new());
        };
        if !self.store.contains_term(&subject)? {
            return Ok(Vec::new());
        }

        let query = format!(
            "PREFIX rdfs: <{rdfs}>\n\
             SELECT ?class (COUNT(DISTINCT ?mid) AS ?paths) \
             WHERE {{ {subject} rdfs:subClassOf* ?mid . ?mid rdfs:subClassOf* ?class . }} \
             GROUP BY ?class \
             ORDER BY ?paths ?class",
            rdfs = vocab::RDFS_NS,
            subject = node,
        );
        debug!(query = %query, "resolving ancestors");
        self.store
            .select(&query)?
            .iter()
            .map(|solution| Ok(Row::new(solution).term("class")?))
            .collect()
    }

    /// Same result set as [`ancestors`](Self::ancestors), answered through
    /// the registered template with `?subject` bound instead of a
    /// per-call query text.
    pub fn ancestors_prepared(&self, subject: impl Into<Term>) -> Result<Vec<Term>> {
        let subject = make_term(subject);
        if !self.store.contains_term(&subject)? {
            return Ok(Vec::new());
        }
        let rows = self
            .queries
            .execute_bound(&self.store, GET_ANCESTORS, &[("subject", &subject)])?;
        rows.iter()
            .map(|solution| Ok(Row::new(solution).term("class")?))
            .collect()
    }
}
