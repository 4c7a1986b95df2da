//! The boundary to the triple-store collaborator.
//!
//! [`GraphStore`] wraps an in-memory [`oxigraph::store::Store`] and owns
//! the loading policy: which file extensions map to which serialization,
//! and the rule that reloading an already-loaded source is a warn-and-skip
//! no-op. Everything else is passthrough: SPARQL evaluation and wildcard
//! fact matching stay the store's job.

use crate::error::{EngineError, Result};
use crate::term::{Fact, Term};
use once_cell::sync::Lazy;
use oxigraph::io::RdfFormat;
use oxigraph::model::{NamedNode, Term as OxTerm};
use oxigraph::sparql::{Query, QueryResults, QuerySolution};
use oxigraph::store::Store;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

static EXT_TO_FORMAT: Lazy<HashMap<&'static str, RdfFormat>> = Lazy::new(|| {
    HashMap::from([
        ("ttl", RdfFormat::Turtle),
        ("nt", RdfFormat::NTriples),
        ("nq", RdfFormat::NQuads),
        ("trig", RdfFormat::TriG),
        ("rdf", RdfFormat::RdfXml),
        ("owl", RdfFormat::RdfXml),
        ("xml", RdfFormat::RdfXml),
    ])
});

/// Shared graph of all loaded ontology documents.
pub struct GraphStore {
    store: Store,
    sources: RwLock<HashSet<PathBuf>>,
}

impl GraphStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            sources: RwLock::new(HashSet::new()),
        })
    }

    /// The loader format registered for a path's extension.
    pub fn format_for(path: &Path) -> Result<RdfFormat> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        EXT_TO_FORMAT.get(ext).copied().ok_or_else(|| {
            EngineError::UnsupportedFormat {
                path: path.display().to_string(),
                ext: ext.to_owned(),
            }
        })
    }

    /// Loads one document. Returns `false` without touching the graph when
    /// this path was already loaded.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        debug!(path = %path.display(), "attempting to load document");
        if self.sources.read().contains(path) {
            warn!(path = %path.display(), "document already loaded, not loading again");
            return Ok(false);
        }

        let format = Self::format_for(path)?;
        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.store
            .load_from_reader(format, BufReader::new(file))
            .map_err(|err| EngineError::Load {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;

        self.sources.write().insert(path.to_path_buf());
        info!(path = %path.display(), "document loaded");
        Ok(true)
    }

    /// Loads every document with a supported extension under `dir`,
    /// in file-name order. Returns how many documents were newly loaded.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut loaded = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|err| EngineError::Io {
                path: dir.display().to_string(),
                source: err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("walk failed")),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if Self::format_for(path).is_err() {
                continue;
            }
            if self.load_path(path)? {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Loads a document from an in-memory reader under a source name,
    /// with the same duplicate-skip rule as [`load_path`](Self::load_path).
    pub fn load_reader(&self, source: &str, format: RdfFormat, reader: impl Read) -> Result<bool> {
        let key = PathBuf::from(source);
        if self.sources.read().contains(&key) {
            warn!(source, "document already loaded, not loading again");
            return Ok(false);
        }
        self.store
            .load_from_reader(format, reader)
            .map_err(|err| EngineError::Load {
                path: source.to_owned(),
                message: err.to_string(),
            })?;
        self.sources.write().insert(key);
        debug!(source, "document loaded from reader");
        Ok(true)
    }

    /// Raw SPARQL passthrough.
    pub fn query(&self, query: &str) -> Result<QueryResults> {
        Ok(self.store.query(query)?)
    }

    /// Runs a SELECT query and collects its rows.
    pub fn select(&self, query: &str) -> Result<Vec<QuerySolution>> {
        match self.store.query(query)? {
            QueryResults::Solutions(solutions) => solutions
                .map(|solution| solution.map_err(EngineError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Runs an already-compiled SELECT query and collects its rows.
    pub fn select_compiled(&self, query: Query) -> Result<Vec<QuerySolution>> {
        match self.store.query(query)? {
            QueryResults::Solutions(solutions) => solutions
                .map(|solution| solution.map_err(EngineError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// All facts matching a partial pattern; `None` is a wildcard.
    /// Literal subjects or predicates match nothing.
    pub fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Fact>> {
        let subject = match subject {
            Some(term) => match term.as_named_node() {
                Some(node) => Some(node),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let predicate = match predicate {
            Some(term) => match term.as_named_node() {
                Some(node) => Some(node),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let object = object.map(term_to_ox);

        let mut facts = Vec::new();
        let quads = self.store.quads_for_pattern(
            subject.as_ref().map(|node| node.into()),
            predicate.as_ref().map(NamedNode::as_ref),
            object.as_ref().map(OxTerm::as_ref),
            None,
        );
        for quad in quads {
            facts.push(Fact::from(quad?));
        }
        Ok(facts)
    }

    /// Whether the term occurs anywhere in the graph, in any position.
    pub fn contains_term(&self, term: &Term) -> Result<bool> {
        if let Some(node) = term.as_named_node() {
            let as_subject = self
                .store
                .quads_for_pattern(Some((&node).into()), None, None, None)
                .next()
                .transpose()?
                .is_some();
            if as_subject {
                return Ok(true);
            }
            let as_predicate = self
                .store
                .quads_for_pattern(None, Some(node.as_ref()), None, None)
                .next()
                .transpose()?
                .is_some();
            if as_predicate {
                return Ok(true);
            }
        }
        let object = term_to_ox(term);
        Ok(self
            .store
            .quads_for_pattern(None, None, Some(object.as_ref()), None)
            .next()
            .transpose()?
            .is_some())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Paths and source names loaded so far.
    pub fn sources(&self) -> Vec<PathBuf> {
        let mut sources: Vec<_> = self.sources.read().iter().cloned().collect();
        sources.sort();
        sources
    }
}

fn term_to_ox(term: &Term) -> OxTerm {
    match term.as_named_node() {
        Some(node) => OxTerm::NamedNode(node),
        None => OxTerm::Literal(oxigraph::model::Literal::new_simple_literal(term.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <http://schema.org/Book> a rdfs:Class ;
            rdfs:label "Book" .
    "#;

    #[test]
    fn unsupported_extension_is_an_error() {
        let store = GraphStore::new().unwrap();
        let err = store.load_path("vocab/schema.csv").unwrap_err();
        match err {
            EngineError::UnsupportedFormat { ext, path } => {
                assert_eq!(ext, "csv");
                assert!(path.ends_with("schema.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_source_is_skipped() -> anyhow::Result<()> {
        let store = GraphStore::new()?;
        assert!(store.load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())?);
        let before = store.len()?;
        assert!(!store.load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())?);
        assert_eq!(store.len()?, before);
        Ok(())
    }

    #[test]
    fn duplicate_file_is_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("schema.ttl");
        let mut file = File::create(&path)?;
        file.write_all(DOC.as_bytes())?;

        let store = GraphStore::new()?;
        assert!(store.load_path(&path)?);
        assert!(!store.load_path(&path)?);
        assert_eq!(store.sources(), vec![path]);
        Ok(())
    }

    #[test]
    fn load_dir_picks_up_supported_files_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("schema.ttl"), DOC)?;
        std::fs::write(dir.path().join("notes.txt"), "not a document")?;

        let store = GraphStore::new()?;
        assert_eq!(store.load_dir(dir.path())?, 1);
        assert!(!store.is_empty()?);
        Ok(())
    }

    #[test]
    fn match_pattern_answers_wildcards() -> anyhow::Result<()> {
        let store = GraphStore::new()?;
        store.load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())?;

        let book = Term::iri("http://schema.org/Book");
        let facts = store.match_pattern(Some(&book), None, None)?;
        assert_eq!(facts.len(), 2);

        let label = store.match_pattern(
            Some(&book),
            Some(&Term::iri("http://www.w3.org/2000/01/rdf-schema#label")),
            None,
        )?;
        assert_eq!(label.len(), 1);
        assert_eq!(label[0].object, Term::literal("Book"));

        // a literal can never be a subject
        assert!(store
            .match_pattern(Some(&Term::literal("Book")), None, None)?
            .is_empty());
        Ok(())
    }

    #[test]
    fn contains_term_checks_every_position() -> anyhow::Result<()> {
        let store = GraphStore::new()?;
        store.load_reader("mem:doc", RdfFormat::Turtle, DOC.as_bytes())?;

        assert!(store.contains_term(&Term::iri("http://schema.org/Book"))?);
        assert!(store.contains_term(&Term::iri("http://www.w3.org/2000/01/rdf-schema#label"))?);
        assert!(store.contains_term(&Term::literal("Book"))?);
        assert!(!store.contains_term(&Term::iri("http://schema.org/Ghost"))?);
        Ok(())
    }
}
