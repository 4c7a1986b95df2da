//! Typed extraction from SPARQL result rows.
//!
//! Converts bindings in a [`QuerySolution`] to [`Term`] values with
//! precise errors, so callers never poke at raw store terms.

use crate::term::Term;
use oxigraph::model::Term as OxTerm;
use oxigraph::sparql::QuerySolution;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("variable {0:?} not bound in result row")]
    Unbound(String),

    #[error("expected {expected} for {var:?}, got {actual}")]
    TypeMismatch {
        var: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// One result row of a SELECT query.
pub struct Row<'a> {
    solution: &'a QuerySolution,
}

impl<'a> Row<'a> {
    pub fn new(solution: &'a QuerySolution) -> Self {
        Self { solution }
    }

    fn get(&self, var: &str) -> Result<&'a OxTerm, BindingError> {
        self.solution
            .get(var)
            .ok_or_else(|| BindingError::Unbound(var.to_owned()))
    }

    /// The binding as a canonical [`Term`], whatever its store kind.
    pub fn term(&self, var: &str) -> Result<Term, BindingError> {
        Ok(Term::from(self.get(var)?.clone()))
    }

    /// The binding as an IRI term; anything else is a type mismatch.
    pub fn iri(&self, var: &str) -> Result<Term, BindingError> {
        match self.get(var)? {
            OxTerm::NamedNode(node) => Ok(Term::Iri(node.as_str().to_owned())),
            other => Err(BindingError::TypeMismatch {
                var: var.to_owned(),
                expected: "IRI",
                actual: term_kind(other),
            }),
        }
    }

    /// The binding as a literal's value; anything else is a type mismatch.
    pub fn literal(&self, var: &str) -> Result<String, BindingError> {
        match self.get(var)? {
            OxTerm::Literal(lit) => Ok(lit.value().to_owned()),
            other => Err(BindingError::TypeMismatch {
                var: var.to_owned(),
                expected: "literal",
                actual: term_kind(other),
            }),
        }
    }
}

fn term_kind(term: &OxTerm) -> &'static str {
    match term {
        OxTerm::NamedNode(_) => "IRI",
        OxTerm::Literal(_) => "literal",
        OxTerm::BlankNode(_) => "blank node",
        _ => "triple term",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::GraphStore;
    use oxigraph::io::RdfFormat;

    fn solution() -> QuerySolution {
        let store = GraphStore::new().unwrap();
        store
            .load_reader(
                "mem:doc",
                RdfFormat::Turtle,
                r#"<http://schema.org/Book> <http://www.w3.org/2000/01/rdf-schema#label> "Book" ."#
                    .as_bytes(),
            )
            .unwrap();
        let mut rows = store
            .select("SELECT ?class ?label WHERE { ?class ?p ?label . }")
            .unwrap();
        assert_eq!(rows.len(), 1);
        rows.remove(0)
    }

    #[test]
    fn extracts_iri_and_literal() {
        let solution = solution();
        let row = Row::new(&solution);
        assert_eq!(row.iri("class").unwrap(), Term::iri("http://schema.org/Book"));
        assert_eq!(row.literal("label").unwrap(), "Book");
        assert_eq!(row.term("label").unwrap(), Term::literal("Book"));
    }

    #[test]
    fn reports_unbound_variables() {
        let solution = solution();
        let row = Row::new(&solution);
        assert!(matches!(row.term("missing"), Err(BindingError::Unbound(_))));
    }

    #[test]
    fn reports_type_mismatches() {
        let solution = solution();
        let row = Row::new(&solution);
        assert!(matches!(
            row.iri("label"),
            Err(BindingError::TypeMismatch { .. })
        ));
        assert!(matches!(
            row.literal("class"),
            Err(BindingError::TypeMismatch { .. })
        ));
    }
}
