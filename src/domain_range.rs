//! Property-to-type resolution for `schema:domainIncludes` and
//! `schema:rangeIncludes`.

use crate::binding::Row;
use crate::error::Result;
use crate::queries::{
    GET_DESCRIBE, GET_DOMAIN_PROPERTIES, GET_RANGE_PROPERTIES, PreparedQueries,
};
use crate::store::GraphStore;
use crate::term::{Term, make_term};
use crate::vocab;
use indexmap::IndexMap;
use std::sync::Arc;

/// Answers "which properties apply to this class" in both directions.
pub struct DomainRangeResolver {
    store: Arc<GraphStore>,
    queries: Arc<PreparedQueries>,
}

impl DomainRangeResolver {
    pub(crate) fn new(store: Arc<GraphStore>, queries: Arc<PreparedQueries>) -> Self {
        Self { store, queries }
    }

    /// Properties whose domain declarations include `class`, mapped to
    /// their declared range types. Properties are in ascending term-string
    /// order; each type list keeps the query's result order. A property
    /// with no range declaration does not appear.
    pub fn properties_with_domain(
        &self,
        class: impl Into<Term>,
    ) -> Result<IndexMap<Term, Vec<Term>>> {
        self.property_map(GET_DOMAIN_PROPERTIES, make_term(class))
    }

    /// The mirror of [`properties_with_domain`](Self::properties_with_domain):
    /// properties whose range declarations include `class`, mapped to
    /// their declared domain types.
    pub fn properties_with_range(
        &self,
        class: impl Into<Term>,
    ) -> Result<IndexMap<Term, Vec<Term>>> {
        self.property_map(GET_RANGE_PROPERTIES, make_term(class))
    }

    fn property_map(&self, query: &str, class: Term) -> Result<IndexMap<Term, Vec<Term>>> {
        let rows = self
            .queries
            .execute_bound(&self.store, query, &[("subject", &class)])?;
        let mut map: IndexMap<Term, Vec<Term>> = IndexMap::new();
        for solution in &rows {
            let row = Row::new(solution);
            map.entry(row.term("property")?)
                .or_default()
                .push(row.term("object")?);
        }
        Ok(map)
    }

    pub fn is_domain_predicate(&self, predicate: impl Into<Term>) -> bool {
        make_term(predicate) == Term::from(vocab::DOMAIN_INCLUDES)
    }

    pub fn is_range_predicate(&self, predicate: impl Into<Term>) -> bool {
        make_term(predicate) == Term::from(vocab::RANGE_INCLUDES)
    }

    /// Every (predicate, object) pair declared on `subject`, ordered by
    /// predicate term string. Unknown subjects yield an empty sequence.
    pub fn predicates_and_objects(&self, subject: impl Into<Term>) -> Result<Vec<(Term, Term)>> {
        let subject = make_term(subject);
        let rows = self
            .queries
            .execute_bound(&self.store, GET_DESCRIBE, &[("subject", &subject)])?;
        rows.iter()
            .map(|solution| {
                let row = Row::new(solution);
                Ok((row.term("predicate")?, row.term("object")?))
            })
            .collect()
    }
}
