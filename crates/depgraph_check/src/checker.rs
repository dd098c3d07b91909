use anyhow::{Context, Result};
use depgraph_core::{CancellationToken, ResolvedPatterns};
use log::{debug, info};

use crate::{
    config::{Config, IgnorePatternsConfig},
    types::CheckResult,
};

pub fn run_dependency_graph_check(
    mut cfg: Config,
    cancel: Option<&CancellationToken>,
) -> Result<CheckResult> {
    info!("Starting dependency graph check");

    // Initialize config (resolve root)
    cfg.initialize()?;
    let analyzer = cfg.workspace.analyzer()?;

    let exclude = analyzer.exclude_patterns();
    debug!("Exclude patterns from {}: {:?}", exclude.source, exclude.patterns);

    let graph = analyzer
        .analyze_workspace(cfg.filter.as_deref(), cancel)
        .with_context(|| format!("Failed to analyze {}", analyzer.root().display()))?;

    info!(
        "Dependency graph check complete. {} nodes, {} edges, {} with cycles",
        graph.nodes.len(),
        graph.edges.len(),
        graph.cyclic_nodes().len()
    );

    let files_analyzed = graph.nodes.len();
    Ok(CheckResult { root: analyzer.root().to_path_buf(), graph, files_analyzed, exclude })
}

pub fn run_ignore_patterns(mut cfg: IgnorePatternsConfig) -> Result<ResolvedPatterns> {
    cfg.workspace.initialize()?;
    let resolved = cfg.workspace.analyzer()?.exclude_patterns();
    info!("Resolved {} exclude patterns from {}", resolved.patterns.len(), resolved.source);
    Ok(resolved)
}
