//! Structural invariants of a built catalog.

use std::collections::HashSet;

use crate::catalog::{Catalog, CatalogNode, NodeKind};
use crate::core::path;

/// Check structural invariants the builder must uphold:
/// - sibling keys unique at every level
/// - leaves carry a suite and no children; groups carry no suite
/// - collection children are member references naming existing siblings
/// - member references appear only under collections
pub fn validate_catalog(catalog: &Catalog) -> Vec<String> {
    let mut errors = Vec::new();
    validate_level(&catalog.roots, "", &mut errors);
    errors
}

fn validate_level(nodes: &[CatalogNode], prefix: &str, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for node in nodes {
        let node_path = path::join(prefix, &node.key);
        if !seen.insert(node.key.as_str()) {
            errors.push(format!("duplicate sibling key at {node_path}"));
        }
        match node.kind {
            NodeKind::Leaf => {
                if node.suite.is_none() {
                    errors.push(format!("{node_path}: leaf without a suite"));
                }
                if !node.children.is_empty() {
                    errors.push(format!("{node_path}: leaf with children"));
                }
            }
            NodeKind::Collection => {
                if node.suite.is_some() {
                    errors.push(format!("{node_path}: collection carries a suite"));
                }
                for member in &node.children {
                    if member.kind != NodeKind::Placeholder {
                        errors.push(format!(
                            "{node_path}: child {} is not a member reference",
                            member.key
                        ));
                    }
                    if !nodes.iter().any(|sibling| sibling.key == member.key) {
                        errors.push(format!(
                            "{node_path}: member {} names no sibling",
                            member.key
                        ));
                    }
                }
            }
            NodeKind::Subtree => {
                if node.suite.is_some() {
                    errors.push(format!("{node_path}: subtree carries a suite"));
                }
                validate_level(&node.children, &node_path, errors);
            }
            NodeKind::Placeholder => {
                errors.push(format!(
                    "{node_path}: member reference outside a collection"
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, collection, leaf, subtree};

    #[test]
    fn well_formed_catalog_passes() {
        let catalog = catalog(vec![
            subtree("unit", vec![leaf("a"), collection("fast", &["a"])]),
            leaf("integ"),
        ]);
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn duplicate_sibling_keys_are_reported() {
        let catalog = catalog(vec![leaf("a"), leaf("a")]);
        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| err.contains("duplicate sibling key")));
    }

    #[test]
    fn dangling_members_are_reported() {
        let catalog = catalog(vec![leaf("a"), collection("fast", &["ghost"])]);
        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| err.contains("names no sibling")));
    }

    #[test]
    fn nested_levels_are_checked() {
        let catalog = catalog(vec![subtree("unit", vec![leaf("x"), leaf("x")])]);
        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| err.contains("unit/x")));
    }
}
