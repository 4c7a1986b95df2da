//! Load RDF schema vocabularies and explore them structurally.
//!
//! The engine ingests ontology documents (class/property hierarchies with
//! labels, descriptions, and schema.org `domainIncludes`/`rangeIncludes`
//! declarations) into an in-memory triple store, then answers which terms
//! are classes or properties, what their ancestor and descendant chains
//! are, which properties apply to a class as subject or object, and
//! whether the loaded ontology is internally consistent.
//!
//! ```no_run
//! use schema_graph::{EngineConfig, SchemaEngine};
//!
//! # fn main() -> schema_graph::Result<()> {
//! let config = EngineConfig {
//!     document_dirs: vec!["vocab".into()],
//!     ..EngineConfig::default()
//! };
//! let engine = SchemaEngine::from_config(&config)?;
//!
//! assert!(engine.is_class("http://schema.org/Book"));
//! for ancestor in engine.ancestors("http://schema.org/Book")? {
//!     println!("{} -> {}", ancestor, engine.label(ancestor.clone()));
//! }
//!
//! let report = engine.consistency().check_all()?;
//! if !report.passed() {
//!     eprintln!("{report}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub mod consistency;
pub mod domain_range;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod queries;
pub mod registry;
pub mod store;
pub mod term;
pub mod vocab;

pub use config::EngineConfig;
pub use consistency::{
    CheckKind, CheckOutcome, ConsistencyChecker, ConsistencyReport, GraphStats, Violation,
};
pub use domain_range::DomainRangeResolver;
pub use engine::SchemaEngine;
pub use error::{EngineError, Result};
pub use hierarchy::HierarchyResolver;
pub use queries::{PreparedQueries, PreparedQuery};
pub use registry::TermRegistry;
pub use store::GraphStore;
pub use term::{Fact, Term, make_term};
