//! Immutable catalog of discovered test groups.
//!
//! The catalog is a forest of named nodes built once at startup from the
//! declaration tree and never mutated afterwards. Sibling order is
//! declaration order; sibling keys are unique and double as path segments,
//! so any node is addressable by the `/`-joined keys from a root down to it.

use crate::suite::SuiteHandle;

/// Key of the synthesized aggregate summarizing a directory level. Reserved:
/// declaration units may not declare an entry under this id.
pub const AGGREGATE_KEY: &str = "all";

/// Node kinds within the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Backed by one runnable suite.
    Leaf,
    /// Named group of declared sibling members.
    Collection,
    /// Synthesized aggregate of everything under a directory level.
    Subtree,
    /// Reference to a collection member whose definition is a sibling node.
    Placeholder,
}

/// One named entry in the catalog hierarchy.
#[derive(Debug)]
pub struct CatalogNode {
    pub key: String,
    pub description: String,
    pub kind: NodeKind,
    /// Ordered children; declared members for a collection, the nested
    /// level's mapping for a subtree, empty for a leaf.
    pub children: Vec<CatalogNode>,
    /// Runnable handle, present only on leaves.
    pub suite: Option<SuiteHandle>,
}

impl CatalogNode {
    pub fn leaf(key: String, description: String, suite: SuiteHandle) -> Self {
        Self {
            key,
            description,
            kind: NodeKind::Leaf,
            children: Vec::new(),
            suite: Some(suite),
        }
    }

    pub fn collection(
        key: String,
        description: String,
        members: impl IntoIterator<Item = String>,
    ) -> Self {
        let children = members.into_iter().map(Self::placeholder).collect();
        Self {
            key,
            description,
            kind: NodeKind::Collection,
            children,
            suite: None,
        }
    }

    pub fn subtree(key: String, description: String, children: Vec<CatalogNode>) -> Self {
        Self {
            key,
            description,
            kind: NodeKind::Subtree,
            children,
            suite: None,
        }
    }

    fn placeholder(key: String) -> Self {
        Self {
            key,
            description: String::new(),
            kind: NodeKind::Placeholder,
            children: Vec::new(),
            suite: None,
        }
    }
}

/// The top-level forest, rooted at the directory given on the command line.
#[derive(Debug, Default)]
pub struct Catalog {
    pub roots: Vec<CatalogNode>,
}

impl Catalog {
    /// Default "run everything" selection: keys of the top-level entries in
    /// declaration order, skipping collections. A collection only aliases
    /// sibling entries that are already part of the selection; keeping it
    /// would run its members a second time under the alias path.
    pub fn default_selection(&self) -> Vec<String> {
        self.roots
            .iter()
            .filter(|node| node.kind != NodeKind::Collection)
            .map(|node| node.key.clone())
            .collect()
    }

    /// True when `key` names a top-level entry.
    pub fn contains_top(&self, key: &str) -> bool {
        self.roots.iter().any(|node| node.key == key)
    }
}
