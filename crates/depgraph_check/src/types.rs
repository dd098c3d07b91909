use depgraph_core::{DependencyGraph, ResolvedPatterns};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Initialized project root; node ids are relative to it
    pub root: PathBuf,
    pub graph: DependencyGraph,
    /// Files that were parsed into graph nodes
    pub files_analyzed: usize,
    /// Exclusion patterns the run used, with their source
    pub exclude: ResolvedPatterns,
}

impl CheckResult {
    pub fn has_cycles(&self) -> bool {
        self.graph.has_cycles()
    }
}
