//! Catalog listing and plan assembly.

use std::fmt::Write;

use anyhow::{Result, bail};

use crate::catalog::{Catalog, CatalogNode, NodeKind};
use crate::core::expand::resolve_node;
use crate::engine::PlanEntry;

/// Render the catalog as an indented listing.
///
/// Collection member references print parenthesized; everything else prints
/// `key : description`.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    render_level(&catalog.roots, "  ", &mut out);
    out
}

fn render_level(nodes: &[CatalogNode], indent: &str, out: &mut String) {
    for node in nodes {
        if node.kind == NodeKind::Placeholder {
            let _ = writeln!(out, "{indent}- ({})", node.key);
            continue;
        }
        let _ = writeln!(out, "{indent}- {} : {}", node.key, node.description);
        if !node.children.is_empty() {
            render_level(&node.children, &format!("{indent}  "), out);
        }
    }
}

/// Look up the suite behind each resolved path.
///
/// Resolution guarantees every path names a leaf, so a lookup failure here
/// means the catalog and the resolver disagree; that is not recoverable.
pub fn assemble_plan<'a>(catalog: &'a Catalog, paths: &'a [String]) -> Result<Vec<PlanEntry<'a>>> {
    let mut plan = Vec::with_capacity(paths.len());
    for path in paths {
        let Some((node, _)) = resolve_node(&catalog.roots, path) else {
            bail!("resolved path {path} is missing from the catalog");
        };
        let Some(suite) = node.suite.as_ref() else {
            bail!("resolved path {path} does not name a runnable suite");
        };
        plan.push(PlanEntry { path, suite });
    }
    Ok(plan)
}
