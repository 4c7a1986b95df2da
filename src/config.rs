//! Engine configuration.
//!
//! The embedding application decides how this struct is produced (CLI,
//! service config, hard-coded in tests); the engine only consumes it.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_validate() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directories scanned for ontology documents at bootstrap.
    #[serde(default)]
    pub document_dirs: Vec<PathBuf>,
    /// Run the consistency suite after loading, logging violations as
    /// warnings (default: true).
    #[serde(default = "default_validate")]
    pub validate_on_load: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            document_dirs: Vec::new(),
            validate_on_load: true,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| EngineError::Config {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate_on_load() {
        let config = EngineConfig::default();
        assert!(config.validate_on_load);
        assert!(config.document_dirs.is_empty());
    }

    #[test]
    fn loads_from_yaml_with_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.yaml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "document_dirs:\n  - vocab/core\n  - vocab/extensions")?;

        let config = EngineConfig::from_file(&path)?;
        assert_eq!(
            config.document_dirs,
            vec![PathBuf::from("vocab/core"), PathBuf::from("vocab/extensions")]
        );
        assert!(config.validate_on_load);
        Ok(())
    }

    #[test]
    fn rejects_malformed_config() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "document_dirs: 17")?;
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(EngineError::Config { .. })
        ));
        Ok(())
    }
}
