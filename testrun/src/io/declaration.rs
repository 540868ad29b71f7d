//! Per-directory declaration units (`suite.toml`).
//!
//! A declaration unit names the tests, collections, and subdirectories of
//! one catalog directory. Structural problems in a unit make the whole run
//! untrustworthy and are fatal; a well-formed unit whose individual entries
//! cannot be honored degrades entry by entry at build time.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::catalog::AGGREGATE_KEY;
use crate::suite::SuiteFactory;

/// File name of the declaration unit expected in every catalog directory.
pub const DECLARATION_FILE: &str = "suite.toml";

/// Raw on-disk shape of a declaration unit. Arrays keep declaration order.
#[derive(Debug, Default, Deserialize)]
pub struct DeclarationFile {
    #[serde(default)]
    pub tests: Vec<TestEntry>,
    #[serde(default)]
    pub collections: Vec<CollectionEntry>,
    #[serde(default)]
    pub subdirs: Vec<SubdirEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TestEntry {
    pub id: String,
    pub description: String,
    /// Command line run from the declaration directory. Absent means the
    /// test is declared but has no runnable suite yet.
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionEntry {
    pub id: String,
    pub description: String,
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubdirEntry {
    pub name: String,
    pub description: String,
}

impl DeclarationFile {
    pub fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let test_ids = self.tests.iter().map(|entry| entry.id.as_str());
        let collection_ids = self.collections.iter().map(|entry| entry.id.as_str());
        let subdir_names = self.subdirs.iter().map(|entry| entry.name.as_str());
        for id in test_ids.chain(collection_ids).chain(subdir_names) {
            check_segment(id)?;
            if !seen.insert(id) {
                bail!("duplicate declaration id '{id}'");
            }
        }
        for test in &self.tests {
            if let Some(command) = &test.command
                && (command.is_empty() || command[0].trim().is_empty())
            {
                bail!("test '{}' has an empty command", test.id);
            }
        }
        for collection in &self.collections {
            for member in &collection.members {
                check_segment(member)?;
            }
        }
        Ok(())
    }
}

fn check_segment(id: &str) -> Result<()> {
    if id.is_empty() || id.contains('/') {
        bail!("declaration id '{id}' must be a single non-empty path segment");
    }
    if id == AGGREGATE_KEY {
        bail!("declaration id '{AGGREGATE_KEY}' is reserved");
    }
    Ok(())
}

/// Declaration unit contents with suite factories attached.
#[derive(Debug)]
pub struct Declaration {
    pub tests: Vec<TestDecl>,
    pub collections: Vec<CollectionDecl>,
    pub subdirs: Vec<SubdirDecl>,
}

pub struct TestDecl {
    pub id: String,
    pub description: String,
    /// Zero-argument suite constructor; `None` when the declaration names a
    /// test without a runnable command.
    pub factory: Option<SuiteFactory>,
}

impl std::fmt::Debug for TestDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestDecl")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("factory", &self.factory.as_ref().map(|_| "<factory>"))
            .finish()
    }
}

#[derive(Debug)]
pub struct CollectionDecl {
    pub id: String,
    pub description: String,
    pub members: Vec<String>,
}

#[derive(Debug)]
pub struct SubdirDecl {
    pub name: String,
    pub description: String,
}

/// Capability for loading declaration units, injected into catalog
/// construction so discovery is deterministic and testable without a
/// filesystem.
pub trait DeclarationSource {
    /// Load the declaration unit for `dir`. Called exactly once per
    /// directory during a build; failures abort the whole run.
    fn load(&self, dir: &Path) -> Result<Declaration>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_sections_in_order() {
        let file = DeclarationFile::parse(
            r#"
            [[tests]]
            id = "numeric"
            description = "Numeric precision checks"
            command = ["./check.sh"]

            [[tests]]
            id = "parser"
            description = "Parser checks"

            [[collections]]
            id = "fast"
            description = "Quick subset"
            members = ["numeric"]

            [[subdirs]]
            name = "regression"
            description = "Regression suites"
            "#,
        )
        .expect("parse");
        let ids: Vec<&str> = file.tests.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["numeric", "parser"]);
        assert_eq!(file.collections[0].members, vec!["numeric"]);
        assert_eq!(file.subdirs[0].name, "regression");
    }

    #[test]
    fn sections_are_optional() {
        let file = DeclarationFile::parse("").expect("parse");
        assert!(file.tests.is_empty());
        assert!(file.collections.is_empty());
        assert!(file.subdirs.is_empty());
    }

    #[test]
    fn duplicate_ids_across_sections_are_rejected() {
        let err = DeclarationFile::parse(
            r#"
            [[tests]]
            id = "unit"
            description = "d"

            [[subdirs]]
            name = "unit"
            description = "d"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate declaration id"));
    }

    #[test]
    fn the_aggregate_id_is_reserved() {
        let err = DeclarationFile::parse(
            r#"
            [[tests]]
            id = "all"
            description = "d"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn empty_commands_are_rejected() {
        let err = DeclarationFile::parse(
            r#"
            [[tests]]
            id = "t"
            description = "d"
            command = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }

    #[test]
    fn member_ids_must_be_single_segments() {
        let err = DeclarationFile::parse(
            r#"
            [[collections]]
            id = "c"
            description = "d"
            members = ["a/b"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("single non-empty path segment"));
    }
}
