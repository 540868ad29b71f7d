//! Recursive catalog construction from declaration units.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::catalog::{AGGREGATE_KEY, Catalog, CatalogNode};
use crate::core::invariants::validate_catalog;
use crate::io::declaration::{CollectionDecl, DeclarationSource};

/// Build the full catalog rooted at `dir`.
///
/// Walks the declaration tree once, assembling each directory level in
/// declaration order: tests, then collections, then subdirectory aggregates.
/// Malformed declaration units are fatal; individual entries that cannot be
/// honored degrade with a warning.
pub fn build_catalog(source: &dyn DeclarationSource, dir: &Path) -> Result<Catalog> {
    let roots = build_level(source, dir, false)?;
    let catalog = Catalog { roots };
    let violations = validate_catalog(&catalog);
    if !violations.is_empty() {
        bail!("catalog is inconsistent:\n- {}", violations.join("\n- "));
    }
    debug!(top_level = catalog.roots.len(), "catalog built");
    Ok(catalog)
}

fn build_level(
    source: &dyn DeclarationSource,
    dir: &Path,
    nested: bool,
) -> Result<Vec<CatalogNode>> {
    let declaration = source
        .load(dir)
        .with_context(|| format!("load declaration unit in {}", dir.display()))?;
    let mut nodes = Vec::new();

    for test in declaration.tests {
        match test.factory {
            Some(factory) => {
                nodes.push(CatalogNode::leaf(test.id, test.description, factory()));
            }
            None => {
                warn!(id = %test.id, dir = %dir.display(), "test has no runnable suite, skipping");
            }
        }
    }

    attach_collections(&mut nodes, declaration.collections, dir);

    for subdir in declaration.subdirs {
        let mut sub_nodes = build_level(source, &dir.join(&subdir.name), true)?;
        // An empty subdirectory produces no aggregate and contributes nothing.
        let Some(position) = sub_nodes.iter().position(|node| node.key == AGGREGATE_KEY) else {
            continue;
        };
        let mut aggregate = sub_nodes.remove(position);
        aggregate.key = subdir.name;
        aggregate.description = subdir.description;
        aggregate.children = sub_nodes;
        nodes.push(aggregate);
    }

    if nested && !nodes.is_empty() {
        nodes.push(CatalogNode::subtree(
            AGGREGATE_KEY.to_string(),
            "All tests".to_string(),
            Vec::new(),
        ));
    }

    Ok(nodes)
}

/// Attach declared collections whose members all resolve.
///
/// Iterates to a fixed point so collections may reference tests or other
/// collections regardless of declaration order; accepted collections keep
/// their declared position. The rest are dropped whole with a warning,
/// including mutually recursive chains that can never resolve.
fn attach_collections(nodes: &mut Vec<CatalogNode>, collections: Vec<CollectionDecl>, dir: &Path) {
    let mut resolved: HashSet<String> = nodes.iter().map(|node| node.key.clone()).collect();
    let mut pending: Vec<(usize, CollectionDecl)> = collections.into_iter().enumerate().collect();
    let mut accepted: Vec<(usize, CollectionDecl)> = Vec::new();

    loop {
        let mut progressed = false;
        let mut still_pending = Vec::new();
        for (index, collection) in pending {
            if collection
                .members
                .iter()
                .all(|member| resolved.contains(member))
            {
                resolved.insert(collection.id.clone());
                accepted.push((index, collection));
                progressed = true;
            } else {
                still_pending.push((index, collection));
            }
        }
        pending = still_pending;
        if !progressed || pending.is_empty() {
            break;
        }
    }

    for (_, collection) in &pending {
        warn!(
            id = %collection.id,
            dir = %dir.display(),
            "collection references missing members, skipping"
        );
    }

    accepted.sort_by_key(|(index, _)| *index);
    for (_, collection) in accepted {
        nodes.push(CatalogNode::collection(
            collection.id,
            collection.description,
            collection.members,
        ));
    }
}
