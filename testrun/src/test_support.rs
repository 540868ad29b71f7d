//! Test-only helpers for constructing catalogs and declaration units.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::catalog::{Catalog, CatalogNode};
use crate::io::declaration::{
    CollectionDecl, DECLARATION_FILE, Declaration, DeclarationSource, SubdirDecl, TestDecl,
};
use crate::suite::{Suite, SuiteFactory, SuiteHandle, SuiteOutcome};

/// Suite with a fixed outcome.
pub struct StaticSuite {
    pub pass: bool,
}

impl Suite for StaticSuite {
    fn run(&self, _verbosity: u8) -> Result<SuiteOutcome> {
        if self.pass {
            Ok(SuiteOutcome::Passed)
        } else {
            Ok(SuiteOutcome::Failed {
                detail: "static failure".to_string(),
            })
        }
    }
}

/// Leaf node backed by an always-passing suite.
pub fn leaf(key: &str) -> CatalogNode {
    CatalogNode::leaf(
        key.to_string(),
        format!("{key} description"),
        SuiteHandle::new(StaticSuite { pass: true }),
    )
}

/// Leaf node backed by an always-failing suite.
pub fn failing_leaf(key: &str) -> CatalogNode {
    CatalogNode::leaf(
        key.to_string(),
        format!("{key} description"),
        SuiteHandle::new(StaticSuite { pass: false }),
    )
}

pub fn collection(key: &str, members: &[&str]) -> CatalogNode {
    CatalogNode::collection(
        key.to_string(),
        format!("{key} description"),
        members.iter().map(|member| member.to_string()),
    )
}

pub fn subtree(key: &str, children: Vec<CatalogNode>) -> CatalogNode {
    CatalogNode::subtree(key.to_string(), format!("{key} description"), children)
}

pub fn catalog(roots: Vec<CatalogNode>) -> Catalog {
    Catalog { roots }
}

/// Declaration unit from its three parts.
pub fn declaration(
    tests: Vec<TestDecl>,
    collections: Vec<CollectionDecl>,
    subdirs: Vec<SubdirDecl>,
) -> Declaration {
    Declaration {
        tests,
        collections,
        subdirs,
    }
}

/// Test declaration with an always-passing factory.
pub fn test_decl(id: &str) -> TestDecl {
    TestDecl {
        id: id.to_string(),
        description: format!("{id} description"),
        factory: Some(Box::new(|| SuiteHandle::new(StaticSuite { pass: true })) as SuiteFactory),
    }
}

/// Test declaration without a runnable suite.
pub fn bare_test_decl(id: &str) -> TestDecl {
    TestDecl {
        id: id.to_string(),
        description: format!("{id} description"),
        factory: None,
    }
}

pub fn collection_decl(id: &str, members: &[&str]) -> CollectionDecl {
    CollectionDecl {
        id: id.to_string(),
        description: format!("{id} description"),
        members: members.iter().map(|member| member.to_string()).collect(),
    }
}

pub fn subdir_decl(name: &str) -> SubdirDecl {
    SubdirDecl {
        name: name.to_string(),
        description: format!("{name} description"),
    }
}

/// In-memory declaration source; each unit can be loaded exactly once.
#[derive(Default)]
pub struct MapSource {
    units: RefCell<HashMap<PathBuf, Declaration>>,
}

impl MapSource {
    pub fn with_unit(self, dir: impl Into<PathBuf>, unit: Declaration) -> Self {
        self.units.borrow_mut().insert(dir.into(), unit);
        self
    }
}

impl DeclarationSource for MapSource {
    fn load(&self, dir: &Path) -> Result<Declaration> {
        self.units
            .borrow_mut()
            .remove(dir)
            .ok_or_else(|| anyhow!("no declaration unit for {}", dir.display()))
    }
}

/// Materialize a declaration tree on disk for end-to-end tests.
///
/// `files` maps tree-relative directories (`""` for the root) to
/// `suite.toml` contents. Returns the tempdir guard plus the tree root.
pub fn declaration_tree(files: &[(&str, &str)]) -> Result<(tempfile::TempDir, PathBuf)> {
    let temp = tempfile::tempdir().context("tempdir")?;
    let root = temp.path().join("testsuite");
    for (relative, contents) in files {
        let dir = if relative.is_empty() {
            root.clone()
        } else {
            root.join(relative)
        };
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(DECLARATION_FILE);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    }
    Ok((temp, root))
}
