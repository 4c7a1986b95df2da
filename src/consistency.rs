//! Consistency rules over the loaded graph.
//!
//! Each check returns its full violation row set so callers can render
//! diagnostics; the checker never raises on a violation. Whether a
//! non-empty set aborts startup or is merely logged is the caller's
//! policy. Every run builds its own report; there is no shared warning
//! state between runs.

use crate::binding::Row;
use crate::error::Result;
use crate::registry::TermRegistry;
use crate::store::GraphStore;
use crate::term::Term;
use crate::vocab;
use serde::Serialize;
use std::fmt;

/// The fixed rule suite, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// `schema:inverseOf` facts must come in symmetric pairs.
    InversePairs,
    /// A subtype need not repeat a domain declaration its supertype carries.
    RedundantDomains,
    /// Same as domains, with `schema:URL` exempt.
    RedundantRanges,
    /// Every range target must be a declared class.
    RangeTargets,
    /// Every domain target must be a declared class.
    DomainTargets,
}

impl CheckKind {
    pub const ALL: [CheckKind; 5] = [
        CheckKind::InversePairs,
        CheckKind::RedundantDomains,
        CheckKind::RedundantRanges,
        CheckKind::RangeTargets,
        CheckKind::DomainTargets,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::InversePairs => "inverse_pairs",
            CheckKind::RedundantDomains => "redundant_domains",
            CheckKind::RedundantRanges => "redundant_ranges",
            CheckKind::RangeTargets => "range_targets",
            CheckKind::DomainTargets => "domain_targets",
        }
    }
}

/// One violation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    UnpairedInverse {
        total: usize,
    },
    RedundantDomain {
        property: Term,
        subtype: Term,
        supertype: Term,
    },
    RedundantRange {
        property: Term,
        subtype: Term,
        supertype: Term,
    },
    InvalidRangeTarget {
        property: Term,
        target: Term,
    },
    InvalidDomainTarget {
        property: Term,
        target: Term,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnpairedInverse { total } => write!(
                f,
                "expected an even number of inverseOf declarations, found {total}"
            ),
            Violation::RedundantDomain {
                property,
                subtype,
                supertype,
            } => write!(
                f,
                "property {property} declares domain {subtype}, a subclass of already-declared {supertype}"
            ),
            Violation::RedundantRange {
                property,
                subtype,
                supertype,
            } => write!(
                f,
                "property {property} declares range {subtype}, a subclass of already-declared {supertype}"
            ),
            Violation::InvalidRangeTarget { property, target } => write!(
                f,
                "property {property} declares range {target}, which is not a declared class"
            ),
            Violation::InvalidDomainTarget { property, target } => write!(
                f,
                "property {property} declares domain {target}, which is not a declared class"
            ),
        }
    }
}

/// Outcome of one check: its kind and every violation it found.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub violations: Vec<Violation>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Sizes of the graph the suite ran against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphStats {
    pub triples: usize,
    pub classes: usize,
    pub properties: usize,
}

/// Full result of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub stats: GraphStats,
    pub checks: Vec<CheckOutcome>,
}

impl ConsistencyReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.checks.iter().flat_map(|check| check.violations.iter())
    }

    pub fn violation_count(&self) -> usize {
        self.checks.iter().map(|check| check.violations.len()).sum()
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} over {} triples, {} classes, {} properties",
            if self.passed() { "consistent" } else { "inconsistent" },
            self.stats.triples,
            self.stats.classes,
            self.stats.properties,
        )?;
        for check in &self.checks {
            writeln!(
                f,
                "  {}: {}",
                check.kind.name(),
                if check.passed() {
                    "ok".to_owned()
                } else {
                    format!("{} violation(s)", check.violations.len())
                }
            )?;
            for violation in &check.violations {
                writeln!(f, "    {violation}")?;
            }
        }
        Ok(())
    }
}

/// Runs the rule suite against the store and the registry's
/// classification tables.
pub struct ConsistencyChecker<'a> {
    store: &'a GraphStore,
    registry: &'a TermRegistry,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(store: &'a GraphStore, registry: &'a TermRegistry) -> Self {
        Self { store, registry }
    }

    /// Runs every check and collects the outcomes with graph statistics.
    pub fn check_all(&self) -> Result<ConsistencyReport> {
        let stats = GraphStats {
            triples: self.store.len()?,
            classes: self.registry.class_count(),
            properties: self.registry.property_count(),
        };
        let mut checks = Vec::with_capacity(CheckKind::ALL.len());
        for kind in CheckKind::ALL {
            checks.push(CheckOutcome {
                kind,
                violations: self.check(kind)?,
            });
        }
        Ok(ConsistencyReport { stats, checks })
    }

    pub fn check(&self, kind: CheckKind) -> Result<Vec<Violation>> {
        match kind {
            CheckKind::InversePairs => self.check_inverse_pairs(),
            CheckKind::RedundantDomains => self.check_redundant_domains(),
            CheckKind::RedundantRanges => self.check_redundant_ranges(),
            CheckKind::RangeTargets => self.check_range_targets(),
            CheckKind::DomainTargets => self.check_domain_targets(),
        }
    }

    /// Every declared inverse relation should appear as a symmetric pair,
    /// so the total count of inverseOf facts must be even.
    pub fn check_inverse_pairs(&self) -> Result<Vec<Violation>> {
        let query = format!(
            "SELECT ?x ?y WHERE {{ ?x <{inverse}> ?y . }}",
            inverse = vocab::INVERSE_OF.as_str()
        );
        let total = self.store.select(&query)?.len();
        if total % 2 == 0 {
            Ok(Vec::new())
        } else {
            Ok(vec![Violation::UnpairedInverse { total }])
        }
    }

    /// Flags (property, c1, c2) where the domain includes both c1 and c2
    /// and c1 is a declared subtype of c2. The subtype's declaration is
    /// already implied by its supertype's.
    pub fn check_redundant_domains(&self) -> Result<Vec<Violation>> {
        let query = format!(
            "PREFIX rdfs: <{rdfs}>\n\
             SELECT ?prop ?c1 ?c2 \
             WHERE {{ \
                 ?prop <{domain}> ?c1 . \
                 ?prop <{domain}> ?c2 . \
                 ?c1 rdfs:subClassOf ?c2 . \
                 FILTER (?c1 != ?c2) \
             }} \
             ORDER BY ?prop ?c1 ?c2",
            rdfs = vocab::RDFS_NS,
            domain = vocab::DOMAIN_INCLUDES.as_str(),
        );
        self.store
            .select(&query)?
            .iter()
            .map(|solution| {
                let row = Row::new(solution);
                Ok(Violation::RedundantDomain {
                    property: row.term("prop")?,
                    subtype: row.term("c1")?,
                    supertype: row.term("c2")?,
                })
            })
            .collect()
    }

    /// As [`check_redundant_domains`](Self::check_redundant_domains) over
    /// range declarations. `schema:URL` is excused: it is special, not
    /// best seen as a Text subtype.
    pub fn check_redundant_ranges(&self) -> Result<Vec<Violation>> {
        let query = format!(
            "PREFIX rdfs: <{rdfs}>\n\
             SELECT ?prop ?c1 ?c2 \
             WHERE {{ \
                 ?prop <{range}> ?c1 . \
                 ?prop <{range}> ?c2 . \
                 ?c1 rdfs:subClassOf ?c2 . \
                 FILTER (?c1 != ?c2) \
                 FILTER (?c1 != <{url}>) \
             }} \
             ORDER BY ?prop ?c1 ?c2",
            rdfs = vocab::RDFS_NS,
            range = vocab::RANGE_INCLUDES.as_str(),
            url = vocab::URL.as_str(),
        );
        self.store
            .select(&query)?
            .iter()
            .map(|solution| {
                let row = Row::new(solution);
                Ok(Violation::RedundantRange {
                    property: row.term("prop")?,
                    subtype: row.term("c1")?,
                    supertype: row.term("c2")?,
                })
            })
            .collect()
    }

    /// Every range target must carry a type declaration and be typed
    /// `rdfs:Class`.
    pub fn check_range_targets(&self) -> Result<Vec<Violation>> {
        let rows = self.invalid_targets(vocab::RANGE_INCLUDES.as_str())?;
        Ok(rows
            .into_iter()
            .map(|(property, target)| Violation::InvalidRangeTarget { property, target })
            .collect())
    }

    /// The symmetric check for domain targets.
    pub fn check_domain_targets(&self) -> Result<Vec<Violation>> {
        let rows = self.invalid_targets(vocab::DOMAIN_INCLUDES.as_str())?;
        Ok(rows
            .into_iter()
            .map(|(property, target)| Violation::InvalidDomainTarget { property, target })
            .collect())
    }

    fn invalid_targets(&self, declaration: &str) -> Result<Vec<(Term, Term)>> {
        let query = format!(
            "PREFIX rdf: <{rdf}>\n\
             PREFIX rdfs: <{rdfs}>\n\
             SELECT ?prop ?c1 \
             WHERE {{ \
                 ?prop <{declaration}> ?c1 . \
                 OPTIONAL {{ ?c1 rdf:type ?c2 . ?c1 rdf:type rdfs:Class . }} \
                 FILTER (!BOUND(?c2)) \
             }} \
             ORDER BY ?prop ?c1",
            rdf = vocab::RDF_NS,
            rdfs = vocab::RDFS_NS,
        );
        self.store
            .select(&query)?
            .iter()
            .map(|solution| {
                let row = Row::new(solution);
                Ok((row.term("prop")?, row.term("c1")?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_render_their_context() {
        let violation = Violation::RedundantDomain {
            property: Term::iri("http://schema.org/author"),
            subtype: Term::iri("http://schema.org/Book"),
            supertype: Term::iri("http://schema.org/Publication"),
        };
        let text = violation.to_string();
        assert!(text.contains("http://schema.org/author"));
        assert!(text.contains("subclass of already-declared"));
    }

    #[test]
    fn report_aggregates_outcomes() {
        let report = ConsistencyReport {
            stats: GraphStats {
                triples: 3,
                classes: 2,
                properties: 1,
            },
            checks: vec![
                CheckOutcome {
                    kind: CheckKind::InversePairs,
                    violations: Vec::new(),
                },
                CheckOutcome {
                    kind: CheckKind::RangeTargets,
                    violations: vec![Violation::InvalidRangeTarget {
                        property: Term::iri("http://schema.org/author"),
                        target: Term::iri("http://schema.org/Person"),
                    }],
                },
            ],
        };
        assert!(!report.passed());
        assert_eq!(report.violation_count(), 1);

        let rendered = report.to_string();
        assert!(rendered.starts_with("inconsistent"));
        assert!(rendered.contains("inverse_pairs: ok"));
        assert!(rendered.contains("range_targets: 1 violation(s)"));
    }

    #[test]
    fn report_serializes() {
        let report = ConsistencyReport {
            stats: GraphStats {
                triples: 0,
                classes: 0,
                properties: 0,
            },
            checks: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["triples"], 0);
    }
}
