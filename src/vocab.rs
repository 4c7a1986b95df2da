//! Vocabulary constants: the schema.org terms this engine treats
//! specially, plus the namespace IRIs bound in prepared-query prefix
//! tables.

use oxigraph::model::NamedNodeRef;

/// schema.org namespace.
pub const SCHEMA_NS: &str = "http://schema.org/";

/// RDF namespace, as bound in prepared-query prefix tables.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDFS namespace, as bound in prepared-query prefix tables.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// schema:domainIncludes, the domain-declaration predicate.
pub const DOMAIN_INCLUDES: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://schema.org/domainIncludes");

/// schema:rangeIncludes, the range-declaration predicate.
pub const RANGE_INCLUDES: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://schema.org/rangeIncludes");

/// schema:inverseOf, expected to appear in symmetric pairs.
pub const INVERSE_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://schema.org/inverseOf");

/// schema:URL is a cross-cutting range type, not a true Text subtype, and
/// is exempt from the redundant-range rule.
pub const URL: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://schema.org/URL");
