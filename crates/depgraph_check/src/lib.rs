//! Dependency graph check for JavaScript/TypeScript projects.
//!
//! This crate wires [`depgraph_core`] to a command line: it resolves the
//! project root, runs the analysis and prints the resulting graph as a tree,
//! a summary of circular dependencies, or JSON.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use depgraph_check::{Config, WorkspaceArgs, run_dependency_graph_check};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     workspace: WorkspaceArgs {
//!         root: Some(std::path::PathBuf::from("/path/to/project")),
//!         exclude: Vec::new(),
//!     },
//!     filter: Some("src".to_string()),
//!     json: false,
//!     fail_on_cycle: true,
//! };
//!
//! let result = run_dependency_graph_check(cfg, None)?;
//!
//! if result.has_cycles() {
//!     // Use buffered output for better performance
//!     let mut stdout = BufWriter::new(std::io::stdout());
//!     depgraph_check::print_summary(&mut stdout, &result.graph, &result.root)?;
//!     stdout.flush()?;
//! }
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::{run_dependency_graph_check, run_ignore_patterns};
pub use config::{Config, IgnorePatternsConfig, WorkspaceArgs};
pub use reporter::{
    print_dependency_tree, print_ignore_patterns, print_no_cycles_message, print_summary,
    write_json,
};
pub use types::CheckResult;
