use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use depgraph_check::{Config, IgnorePatternsConfig};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(about = "Source dependency graphs for JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the dependency graph and report circular dependencies
    Graph(Config),
    /// Show the exclusion patterns that apply to the project
    IgnorePatterns(IgnorePatternsConfig),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Graph(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running dependency graph check (using {} threads)", num_threads);
            debug!("Config: root={:?}, filter={:?}", cfg.workspace.root, cfg.filter);

            let json = cfg.json;
            let fail_on_cycle = cfg.fail_on_cycle;
            let result = depgraph_check::run_dependency_graph_check(cfg, None)?;
            debug!("Found {} cycle-affected files", result.graph.cyclic_nodes().len());

            if json {
                depgraph_check::write_json(&mut stdout, &result.graph)?;
            } else {
                depgraph_check::print_dependency_tree(&mut stdout, &result.graph, &result.root)?;
                if result.has_cycles() {
                    depgraph_check::print_summary(&mut stdout, &result.graph, &result.root)?;
                } else {
                    depgraph_check::print_no_cycles_message(&mut stdout)?;
                }

                let elapsed_ms = start.elapsed().as_millis();
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    result.files_analyzed.to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if fail_on_cycle && result.has_cycles() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }

            Ok(())
        }
        Commands::IgnorePatterns(cfg) => {
            let resolved = depgraph_check::run_ignore_patterns(cfg)?;
            depgraph_check::print_ignore_patterns(&mut stdout, &resolved)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
