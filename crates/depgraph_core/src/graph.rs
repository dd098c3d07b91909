use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{
    cancel::{self, CancellationToken},
    error::AnalysisError,
    parser::imports_for,
    paths::workspace_id,
    resolver::ModuleResolver,
    types::{DependencyEdge, DependencyGraph, DependencyNode},
};

/// Builds nodes and edges for `files`. Cycle flags are left unset.
///
/// Files are parsed in parallel; node order follows `files`. A file that
/// fails to parse is left out of the graph, as are imports that do not
/// resolve to a file on disk.
pub fn build_graph(
    resolver: &ModuleResolver,
    files: &[PathBuf],
    cancel: Option<&CancellationToken>,
) -> Result<DependencyGraph, AnalysisError> {
    debug!("Analyzing {} files", files.len());

    let analyzed: Vec<Option<DependencyNode>> = files
        .par_iter()
        .map(|file| {
            cancel::check(cancel)?;
            Ok(analyze_file(resolver, file))
        })
        .collect::<Result<_, AnalysisError>>()?;
    let nodes: Vec<DependencyNode> = analyzed.into_iter().flatten().collect();
    info!("Generated {} nodes", nodes.len());

    cancel::check(cancel)?;

    let edges = generate_edges(&nodes);
    info!("Generated {} edges", edges.len());

    Ok(DependencyGraph { nodes, edges })
}

fn analyze_file(resolver: &ModuleResolver, file: &Path) -> Option<DependencyNode> {
    let specs = match imports_for(file) {
        Ok(specs) => specs,
        Err(e) => {
            warn!("Failed to analyze file {}: {}", file.display(), e);
            return None;
        }
    };

    let root = resolver.root();
    let dependencies: Vec<String> = specs
        .iter()
        .filter_map(|spec| {
            let resolved = resolver.resolve(&spec.request, file);
            if resolved.is_none() {
                trace!("Dropping unresolved import '{}' in {}", spec.request, file.display());
            }
            resolved
        })
        .map(|resolved| workspace_id(root, &resolved))
        .collect();

    Some(DependencyNode {
        id: workspace_id(root, file),
        file_path: file.to_path_buf(),
        dependencies,
        has_cycle: false,
    })
}

/// One edge per distinct (node, dependency) pair whose target is a node.
pub fn generate_edges(nodes: &[DependencyNode]) -> Vec<DependencyEdge> {
    let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();

    for node in nodes {
        for dep in &node.dependencies {
            if known.contains(dep.as_str()) && seen.insert((node.id.as_str(), dep.as_str())) {
                edges.push(DependencyEdge { from: node.id.clone(), to: dep.clone() });
            }
        }
    }

    edges
}
