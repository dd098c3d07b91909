use anyhow::{Result, anyhow};
use clap::{Args, Parser};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Shared `--root` and `--exclude` flags.
#[derive(Debug, Clone, Default, Args)]
pub struct WorkspaceArgs {
    /// Root directory of the project (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Exclusion glob, repeatable. Replaces .depgraph.json and ignore files
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

impl WorkspaceArgs {
    /// Resolve the root directory, falling back to the enclosing git root
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, searching for git root");
            depgraph_core::find_git_root()?
        };
        info!("Using root directory: {}", root.display());
        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&Path> {
        self.root
            .as_deref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    /// Analyzer for the initialized root, honoring `--exclude` when given.
    pub fn analyzer(&self) -> Result<depgraph_core::Analyzer> {
        let analyzer = depgraph_core::Analyzer::new(self.root()?);
        if self.exclude.is_empty() {
            Ok(analyzer)
        } else {
            debug!("Using {} exclude patterns from the command line", self.exclude.len());
            Ok(analyzer.with_exclude(self.exclude.clone()))
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "graph")]
#[command(about = "Build the dependency graph of a JavaScript/TypeScript project")]
pub struct Config {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Comma-separated directories or globs to analyze (e.g. "src,lib/**/*.ts")
    #[arg(long)]
    pub filter: Option<String>,

    /// Print the graph as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero status when a circular dependency is found
    #[arg(long)]
    pub fail_on_cycle: bool,
}

impl Config {
    pub fn initialize(&mut self) -> Result<()> {
        self.workspace.initialize()
    }

    pub fn root(&self) -> Result<&Path> {
        self.workspace.root()
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ignore-patterns")]
#[command(about = "Show which exclusion patterns apply to a project")]
pub struct IgnorePatternsConfig {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}
