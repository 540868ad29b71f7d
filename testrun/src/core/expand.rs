//! Flattening of catalog paths into their transitive leaf paths.

use crate::catalog::{Catalog, CatalogNode, NodeKind};
use crate::core::path;

/// Resolve `target` to its node along `/`-separated segments.
///
/// Returns the node together with the sibling level it lives in. Collection
/// segments are walked through their declared members, which resolve at the
/// collection's own sibling level. `None` for unknown paths and for paths
/// that descend past a leaf.
pub fn resolve_node<'a>(
    roots: &'a [CatalogNode],
    target: &str,
) -> Option<(&'a CatalogNode, &'a [CatalogNode])> {
    let segments: Vec<&str> = target.split('/').collect();
    resolve_segments(roots, &segments)
}

fn resolve_segments<'a>(
    nodes: &'a [CatalogNode],
    segments: &[&str],
) -> Option<(&'a CatalogNode, &'a [CatalogNode])> {
    let (first, rest) = segments.split_first()?;
    let node = nodes.iter().find(|node| node.key == *first)?;
    if rest.is_empty() {
        return Some((node, nodes));
    }
    match node.kind {
        NodeKind::Leaf | NodeKind::Placeholder => None,
        NodeKind::Subtree => resolve_segments(&node.children, rest),
        NodeKind::Collection => {
            // Deeper segments address declared members; the member's own
            // definition is a sibling of the collection.
            node.children.iter().find(|member| member.key == rest[0])?;
            resolve_segments(nodes, rest)
        }
    }
}

/// Expand `target` into the leaf paths transitively reachable under it.
///
/// Leaves expand to themselves. Collections expand their declared members in
/// declaration order, qualified under the collection's path. Subtrees expand
/// their direct leaves and nested subtrees; collection children are skipped
/// there since they only alias sibling entries the subtree already covers.
/// Unknown paths expand to nothing.
pub fn expand(catalog: &Catalog, target: &str) -> Vec<String> {
    let Some((node, siblings)) = resolve_node(&catalog.roots, target) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    expand_node(node, siblings, target, &mut out);
    out
}

fn expand_node(node: &CatalogNode, siblings: &[CatalogNode], prefix: &str, out: &mut Vec<String>) {
    match node.kind {
        NodeKind::Leaf => out.push(prefix.to_string()),
        NodeKind::Collection => {
            for member in &node.children {
                if let Some(target) = siblings.iter().find(|node| node.key == member.key) {
                    expand_node(target, siblings, &path::join(prefix, &member.key), out);
                }
            }
        }
        NodeKind::Subtree => {
            for child in &node.children {
                if child.kind == NodeKind::Collection {
                    continue;
                }
                expand_node(child, &node.children, &path::join(prefix, &child.key), out);
            }
        }
        NodeKind::Placeholder => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, collection, leaf, subtree};

    fn sample() -> Catalog {
        catalog(vec![
            subtree(
                "unit",
                vec![
                    leaf("a"),
                    leaf("b"),
                    collection("fast", &["a"]),
                    subtree("inner", vec![leaf("c")]),
                ],
            ),
            leaf("integ"),
        ])
    }

    #[test]
    fn leaf_expands_to_itself() {
        assert_eq!(expand(&sample(), "integ"), vec!["integ"]);
        assert_eq!(expand(&sample(), "unit/a"), vec!["unit/a"]);
    }

    #[test]
    fn subtree_expands_leaves_and_nested_subtrees() {
        assert_eq!(
            expand(&sample(), "unit"),
            vec!["unit/a", "unit/b", "unit/inner/c"]
        );
    }

    #[test]
    fn collection_members_qualify_under_the_collection() {
        assert_eq!(expand(&sample(), "unit/fast"), vec!["unit/fast/a"]);
        assert_eq!(expand(&sample(), "unit/fast/a"), vec!["unit/fast/a"]);
    }

    #[test]
    fn nested_collections_flatten_fully() {
        let catalog = catalog(vec![
            leaf("x"),
            leaf("y"),
            collection("inner", &["y"]),
            collection("outer", &["x", "inner"]),
        ]);
        assert_eq!(expand(&catalog, "outer"), vec!["outer/x", "outer/inner/y"]);
    }

    #[test]
    fn unknown_paths_expand_to_nothing() {
        assert!(expand(&sample(), "nope").is_empty());
        assert!(expand(&sample(), "unit/nope").is_empty());
        assert!(expand(&sample(), "integ/deeper").is_empty());
    }

    #[test]
    fn collection_segments_require_declared_members() {
        // `b` exists as a sibling but is not a member of `fast`.
        assert!(expand(&sample(), "unit/fast/b").is_empty());
    }
}
