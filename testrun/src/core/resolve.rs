//! Include/exclude selection algebra over the catalog.

use tracing::warn;

use crate::catalog::Catalog;
use crate::core::expand::expand;
use crate::core::path;

/// Resolve a working selection into the final ordered set of leaf paths.
///
/// Applies include directives, then exclude directives, then flattens every
/// surviving entry, and returns the sorted, deduplicated result.
/// Deterministic and idempotent; directives naming no known top-level group
/// are ignored with a warning.
pub fn resolve(
    catalog: &Catalog,
    base: Vec<String>,
    includes: &[String],
    excludes: &[String],
) -> Vec<String> {
    let mut working = base;
    for include in includes {
        apply_include(catalog, &mut working, include);
    }
    for exclude in excludes {
        apply_exclude(catalog, &mut working, exclude);
    }
    let snapshot = std::mem::take(&mut working);
    for entry in &snapshot {
        working.extend(expand(catalog, entry));
    }
    working.sort();
    working.dedup();
    working
}

fn apply_include(catalog: &Catalog, working: &mut Vec<String>, include: &str) {
    if !catalog.contains_top(path::head(include)) {
        warn!(path = include, "include names no known test group, ignoring");
        return;
    }
    working.push(include.to_string());
}

/// Remove `exclude` and everything it covers from the working list.
///
/// Ancestors of the excluded path sitting verbatim in the working list are
/// expanded first; removing only the literal ancestor would let the deeper
/// entry reappear when the ancestor flattens later.
fn apply_exclude(catalog: &Catalog, working: &mut Vec<String>, exclude: &str) {
    if !catalog.contains_top(path::head(exclude)) {
        warn!(path = exclude, "exclude names no known test group, ignoring");
        return;
    }
    for prefix in path::strict_prefixes(exclude) {
        if working.iter().any(|entry| entry == &prefix) {
            expand_in_place(catalog, working, &prefix);
        }
    }
    working.retain(|entry| entry != exclude);
    for victim in expand(catalog, exclude) {
        working.retain(|entry| entry != &victim);
    }
}

/// Replace every occurrence of `target` in `working` with its expansion,
/// spliced in at the first occurrence.
fn expand_in_place(catalog: &Catalog, working: &mut Vec<String>, target: &str) {
    let Some(first) = working.iter().position(|entry| entry == target) else {
        return;
    };
    working.retain(|entry| entry != target);
    let expanded = expand(catalog, target);
    working.splice(first..first, expanded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, collection, leaf, subtree};

    /// Top-level `unit` grouping leaves `a` and `b`, plus a lone `integ` leaf.
    fn sample() -> Catalog {
        catalog(vec![
            subtree("unit", vec![leaf("a"), leaf("b")]),
            leaf("integ"),
        ])
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn base_without_directives_is_sorted_and_deduplicated() {
        let result = resolve(
            &sample(),
            strings(&["integ", "unit/b", "integ", "unit/a"]),
            &[],
            &[],
        );
        assert_eq!(result, strings(&["integ", "unit/a", "unit/b"]));
    }

    #[test]
    fn base_entries_that_resolve_to_nothing_are_dropped() {
        let result = resolve(&sample(), strings(&["integ", "ghost"]), &[], &[]);
        assert_eq!(result, strings(&["integ"]));
    }

    #[test]
    fn resolution_is_idempotent() {
        let once = resolve(&sample(), strings(&["unit", "integ"]), &[], &[]);
        let twice = resolve(&sample(), once.clone(), &[], &[]);
        assert_eq!(once, twice);
    }

    #[test]
    fn default_base_expands_groups() {
        let result = resolve(&sample(), strings(&["unit", "integ"]), &[], &[]);
        assert_eq!(result, strings(&["integ", "unit/a", "unit/b"]));
    }

    #[test]
    fn excluding_a_group_removes_its_whole_expansion() {
        let result = resolve(&sample(), strings(&["unit", "integ"]), &[], &strings(&["unit"]));
        assert_eq!(result, strings(&["integ"]));
    }

    #[test]
    fn excluding_a_leaf_expands_its_ancestor_first() {
        let result = resolve(&sample(), strings(&["unit"]), &[], &strings(&["unit/a"]));
        assert_eq!(result, strings(&["unit/b"]));
    }

    #[test]
    fn excluding_through_a_collection_keeps_the_other_member() {
        let catalog = catalog(vec![subtree(
            "g",
            vec![leaf("x"), leaf("y"), collection("sub", &["x", "y"])],
        )]);
        let result = resolve(
            &catalog,
            strings(&["g/sub"]),
            &[],
            &strings(&["g/sub/x"]),
        );
        assert_eq!(result, strings(&["g/sub/y"]));
    }

    #[test]
    fn includes_extend_the_base() {
        let result = resolve(&sample(), Vec::new(), &strings(&["unit"]), &[]);
        assert_eq!(result, strings(&["unit/a", "unit/b"]));
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let base = strings(&["integ"]);
        let result = resolve(
            &sample(),
            base.clone(),
            &strings(&["nope"]),
            &strings(&["also-nope"]),
        );
        assert_eq!(result, base);
    }

    #[test]
    fn empty_resolution_is_not_an_error() {
        let result = resolve(&sample(), Vec::new(), &[], &[]);
        assert!(result.is_empty());
    }
}
