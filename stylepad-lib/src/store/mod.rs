//! File-backed stylesheet store.
//!
//! Every operation reads the whole file, edits it in memory and writes it back
//! through a temp file in the same directory. There is no locking: two
//! concurrent writers race and the last rename wins.

pub mod ruleset;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::style::property::to_kebab_case;
pub use ruleset::{MatchMode, RuleSet, HEADER};

pub const DEFAULT_STYLES_PATH: &str = "css/editor-custom.css";

#[derive(Debug, Clone)]
pub struct StyleStore {
    path: PathBuf,
    match_mode: MatchMode,
}

impl StyleStore {
    pub fn new(path: impl Into<PathBuf>, match_mode: MatchMode) -> Self {
        StyleStore {
            path: path.into(),
            match_mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Sets one property (camel-case or CSS form) on `selector`.
    pub fn upsert(&self, selector: &str, property: &str, value: &str) -> Result<(), StoreError> {
        let css_property = to_kebab_case(property);
        let mut rules = RuleSet::parse(&self.get_all()?);
        rules.upsert_declaration(selector, &css_property, value, self.match_mode);
        self.write(&rules.serialize())?;
        log::info!("Saved: {} {{ {}: {} }}", selector, css_property, value);
        Ok(())
    }

    /// Raw file contents; empty when the file does not exist yet.
    pub fn get_all(&self) -> Result<String, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(css) => Ok(css),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Leaves only the header, creating the file if needed.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.write(&RuleSet::new().serialize())?;
        log::info!("Cleared {}", self.path.display());
        Ok(())
    }

    /// Removes a selector's block. Missing selectors and a missing file are
    /// not errors.
    pub fn delete(&self, selector: &str) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut rules = RuleSet::parse(&self.get_all()?);
        if rules.remove(selector) {
            log::info!("Deleted: {}", selector);
        }
        self.write(&rules.serialize())
    }

    fn write(&self, css: &str) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(css.as_bytes())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

impl Default for StyleStore {
    fn default() -> Self {
        StyleStore::new(DEFAULT_STYLES_PATH, MatchMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StyleStore::new(dir.path().join("nested/custom.css"), MatchMode::Exact);
        assert_eq!(store.get_all().expect("read"), "");
        store.delete(".a").expect("delete");
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StyleStore::new(dir.path().join("css/custom.css"), MatchMode::Exact);
        store.upsert(".hero-text", "fontSize", "24px").expect("upsert");
        assert_eq!(
            store.get_all().expect("read"),
            format!("{}\n.hero-text {{\n    font-size: 24px;\n}}\n\n", HEADER)
        );
    }
}
