use log::{debug, info};
use path_clean::PathClean;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use crate::{
    cancel::{self, CancellationToken},
    collector::collect_files,
    config::read_settings,
    cycles::annotate_cycles,
    error::AnalysisError,
    graph::build_graph,
    ignore_patterns::{ResolvedPatterns, resolve_exclude_patterns},
    notify::{LogNotifier, Notifier},
    resolver::ModuleResolver,
    types::DependencyGraph,
};

/// State owned by a single analysis run and dropped when it finishes.
struct AnalysisContext {
    resolver: ModuleResolver,
}

impl AnalysisContext {
    fn new(root: &Path) -> Self {
        Self { resolver: ModuleResolver::new(root) }
    }
}

/// Entry point for analyzing a workspace.
///
/// ```no_run
/// use depgraph_core::Analyzer;
///
/// # fn main() -> Result<(), depgraph_core::AnalysisError> {
/// let graph = Analyzer::new("/path/to/project").analyze_workspace(Some("src"), None)?;
/// for node in graph.cyclic_nodes() {
///     println!("{} is part of an import cycle", node.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Analyzer {
    root: PathBuf,
    exclude: Option<Vec<String>>,
    notifier: Arc<dyn Notifier>,
}

impl Analyzer {
    /// Relative roots are resolved against the current directory so node
    /// file paths are always absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).map(|p| p.clean()).unwrap_or(root);
        Self { root, exclude: None, notifier: Arc::new(LogNotifier) }
    }

    /// Explicit exclusion globs. Overrides the settings file; an empty list
    /// falls through to the ignore files.
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The exclusion patterns a run would use right now, with their source.
    pub fn exclude_patterns(&self) -> ResolvedPatterns {
        let configured = match &self.exclude {
            Some(exclude) => exclude.clone(),
            None => read_settings(&self.root).exclude,
        };
        resolve_exclude_patterns(&self.root, &configured)
    }

    /// Collects the source files selected by `filter` (comma-separated
    /// directory fragments or file globs; `None` means every source file),
    /// builds their dependency graph and flags cycle-affected nodes.
    ///
    /// Fails only with [`AnalysisError::Cancelled`]; unreadable files, parse
    /// errors and unresolved imports are logged and skipped.
    pub fn analyze_workspace(
        &self,
        filter: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<DependencyGraph, AnalysisError> {
        cancel::check(cancel)?;
        let start = Instant::now();
        info!("Analyzing workspace {}", self.root.display());

        let exclude = self.exclude_patterns();
        debug!("Using {} exclude patterns from {}", exclude.patterns.len(), exclude.source);

        let files = collect_files(&self.root, filter, &exclude.patterns, self.notifier.as_ref());
        info!("Found {} source files", files.len());
        cancel::check(cancel)?;

        let context = AnalysisContext::new(&self.root);
        let mut graph = build_graph(&context.resolver, &files, cancel)?;
        debug!("Resolver cached {} lookups", context.resolver.cached_lookups());

        cancel::check(cancel)?;
        annotate_cycles(&mut graph.nodes);

        info!(
            "Analysis complete: {} nodes, {} edges in {}ms",
            graph.nodes.len(),
            graph.edges.len(),
            start.elapsed().as_millis()
        );
        Ok(graph)
    }
}
