//! Canonical term representation.
//!
//! Every public entry point of the engine coerces its input through
//! [`make_term`]; internal components only ever compare [`Term`] values,
//! never raw strings against terms.

use oxigraph::model::{NamedNode, NamedNodeRef, Quad, Term as OxTerm};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A node of the schema graph: either a URI-identified entity or a
/// literal value.
///
/// Terms compare by canonical string form. Blank nodes and other exotic
/// store terms degrade to opaque literals of their display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Iri(String),
    Literal(String),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// The canonical string form: the IRI itself, or the literal's value.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(value) | Term::Literal(value) => value,
        }
    }

    /// A validated store node for this term, when it names one. Literals
    /// and malformed IRIs yield `None`; callers treat that as "matches
    /// nothing" rather than an error.
    pub(crate) fn as_named_node(&self) -> Option<NamedNode> {
        match self {
            Term::Iri(value) => NamedNode::new(value).ok(),
            Term::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str()
            .cmp(other.as_str())
            .then_with(|| self.is_literal().cmp(&other.is_literal()))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Iri(value.to_owned())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Iri(value)
    }
}

impl From<&Term> for Term {
    fn from(value: &Term) -> Self {
        value.clone()
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::Iri(node.into_string())
    }
}

impl From<NamedNodeRef<'_>> for Term {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Term::Iri(node.as_str().to_owned())
    }
}

impl From<OxTerm> for Term {
    fn from(term: OxTerm) -> Self {
        match term {
            OxTerm::NamedNode(node) => Term::Iri(node.into_string()),
            OxTerm::Literal(lit) => Term::Literal(lit.value().to_owned()),
            other => Term::Literal(other.to_string()),
        }
    }
}

/// The single coercion boundary: plain strings become URI terms, terms
/// pass through unchanged. Idempotent by construction.
pub fn make_term(value: impl Into<Term>) -> Term {
    value.into()
}

/// One (subject, predicate, object) triple of the loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl From<Quad> for Fact {
    fn from(quad: Quad) -> Self {
        Fact {
            subject: Term::from(OxTerm::from(quad.subject)),
            predicate: Term::from(quad.predicate),
            object: Term::from(quad.object),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
