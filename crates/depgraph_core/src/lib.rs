//! Source-dependency graph analysis for JavaScript/TypeScript workspaces.
//!
//! This crate turns a workspace into a graph of files and the local files
//! they import:
//! - Resolving which exclusion patterns apply (settings, ignore files, defaults)
//! - Collecting `.ts`/`.tsx`/`.js`/`.jsx` files under the workspace root
//! - Extracting `import`, `export ... from` and `require(...)` specifiers
//! - Resolving specifiers to files (relative, `@/` alias, root-relative)
//! - Building nodes and edges, and flagging nodes affected by import cycles
//!
//! [`Analyzer::analyze_workspace`] runs all of it; the individual phases are
//! exported for front ends that need them separately.

mod analyzer;
mod cancel;
mod collector;
mod config;
mod constants;
mod cycles;
mod error;
mod graph;
mod ignore_patterns;
mod notify;
mod parser;
mod paths;
mod resolver;
mod types;

// Re-export public API
pub use analyzer::Analyzer;
pub use cancel::{AnalysisScheduler, CancellationToken, Ticket};
pub use collector::{ScanFailure, build_include_patterns, collect_files};
pub use config::{Settings, find_git_root, read_settings};
pub use constants::{
    DEFAULT_EXCLUDE_PATTERNS, PROJECT_IGNORE_FILE, SETTINGS_FILE, SOURCE_EXTENSIONS,
    VCS_IGNORE_FILE,
};
pub use cycles::annotate_cycles;
pub use error::AnalysisError;
pub use graph::{build_graph, generate_edges};
pub use ignore_patterns::{
    PatternSource, ResolvedPatterns, normalize_pattern, parse_ignore_file,
    resolve_exclude_patterns,
};
pub use notify::{LogNotifier, Notifier};
pub use parser::imports_for;
pub use paths::{make_relative, workspace_id};
pub use resolver::{ModuleResolver, resolve_specifier};
pub use types::{DependencyEdge, DependencyGraph, DependencyNode, SpecKind, Specifier};
