use std::{
    collections::{HashMap, HashSet},
    env,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use depgraph_core::{DependencyGraph, DependencyNode, ResolvedPatterns, make_relative};
use log::{debug, trace};

/// Cyclic nodes listed by name in the summary
const MAX_LISTED_CYCLES: usize = 10;

/// Relativize a workspace id to the current working directory for clickable links
fn relativize_to_cwd(root: &Path, id: &str) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return id.to_string();
        }
    };

    match make_relative(&root.join(id), &cwd) {
        Some(rel_path) => {
            let result = rel_path.to_string_lossy().to_string();
            trace!("Relativized '{}' to '{}'", id, result);
            result
        }
        None => id.to_string(),
    }
}

struct TreeLine<'a> {
    node: &'a DependencyNode,
    prefix: String,
    is_last: bool,
    depth: usize,
}

/// Prints every root with its transitive dependencies.
///
/// A node's subtree is expanded the first time it is printed; later
/// occurrences (including the ones closing a cycle) are marked and not
/// expanded again.
pub fn print_dependency_tree<W: Write>(
    writer: &mut W,
    graph: &DependencyGraph,
    root: &Path,
) -> io::Result<()> {
    let by_id: HashMap<&str, &DependencyNode> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let roots = graph.roots();
    debug!("Printing dependency tree for {} roots", roots.len());

    writeln!(
        writer,
        "{} Dependency graph ({} files, {} imports)\n",
        "●".bright_blue(),
        graph.nodes.len().to_string().cyan(),
        graph.edges.len().to_string().cyan()
    )?;

    let mut expanded: HashSet<&str> = HashSet::new();
    let mut stack: Vec<TreeLine<'_>> = roots
        .iter()
        .rev()
        .map(|&node| TreeLine { node, prefix: String::new(), is_last: true, depth: 0 })
        .collect();

    let mut first_root = true;
    while let Some(line) = stack.pop() {
        if line.depth == 0 {
            // Blank line between root trees
            if !first_root {
                writeln!(writer)?;
            }
            first_root = false;
        }

        let display_path = relativize_to_cwd(root, &line.node.id);
        let label =
            if line.node.has_cycle { display_path.red().bold() } else { display_path.normal() };
        let cycle_marker = if line.node.has_cycle { " ↻".red().to_string() } else { String::new() };

        if line.depth == 0 {
            write!(writer, "{}{}", label, cycle_marker)?;
        } else {
            let branch = if line.is_last { "└──" } else { "├──" };
            write!(writer, "{}{}  {}{}", line.prefix, branch.dimmed(), label, cycle_marker)?;
        }

        let first_visit = expanded.insert(line.node.id.as_str());
        let children: Vec<&DependencyNode> = unique_dependencies(line.node, &by_id);
        if !first_visit && !children.is_empty() {
            writeln!(writer, " {}", "(shown above)".dimmed())?;
            continue;
        }
        writeln!(writer)?;

        let child_prefix = if line.depth == 0 {
            String::new()
        } else if line.is_last {
            format!("{}    ", line.prefix)
        } else {
            format!("{}{}   ", line.prefix, "│".dimmed())
        };
        let count = children.len();
        for (idx, child) in children.into_iter().enumerate().rev() {
            stack.push(TreeLine {
                node: child,
                prefix: child_prefix.clone(),
                is_last: idx + 1 == count,
                depth: line.depth + 1,
            });
        }
    }

    writer.flush()?;
    Ok(())
}

/// Known dependencies of `node` in import order, each listed once.
fn unique_dependencies<'a>(
    node: &DependencyNode,
    by_id: &HashMap<&str, &'a DependencyNode>,
) -> Vec<&'a DependencyNode> {
    let mut seen = HashSet::new();
    node.dependencies
        .iter()
        .filter(|dep| seen.insert(dep.as_str()))
        .filter_map(|dep| by_id.get(dep.as_str()).copied())
        .collect()
}

pub fn print_summary<W: Write>(
    writer: &mut W,
    graph: &DependencyGraph,
    root: &Path,
) -> io::Result<()> {
    let cyclic = graph.cyclic_nodes();

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Files: {}", graph.nodes.len().to_string().cyan())?;
    writeln!(writer, "  Imports: {}", graph.edges.len().to_string().cyan())?;
    writeln!(writer, "  Roots: {}", graph.roots().len().to_string().cyan())?;

    if cyclic.is_empty() {
        writer.flush()?;
        return Ok(());
    }

    writeln!(
        writer,
        "  Files in or leading into cycles: {}",
        cyclic.len().to_string().red().bold()
    )?;
    for node in cyclic.iter().take(MAX_LISTED_CYCLES) {
        writeln!(writer, "    {} {}", "↻".red(), relativize_to_cwd(root, &node.id).blue())?;
    }
    if cyclic.len() > MAX_LISTED_CYCLES {
        writeln!(writer, "    ... and {} more", cyclic.len() - MAX_LISTED_CYCLES)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn print_no_cycles_message<W: Write>(writer: &mut W) -> io::Result<()> {
    debug!("No cycles detected");
    writeln!(writer, "{} No circular dependencies detected.", "✓".green().bold())?;
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, graph: &DependencyGraph) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, graph)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn print_ignore_patterns<W: Write>(
    writer: &mut W,
    resolved: &ResolvedPatterns,
) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} exclude patterns from {}",
        "●".bright_blue(),
        resolved.patterns.len().to_string().cyan(),
        resolved.source.to_string().bold()
    )?;
    for pattern in &resolved.patterns {
        writeln!(writer, "  {}", pattern)?;
    }
    writer.flush()?;
    Ok(())
}
