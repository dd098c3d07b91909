use serde::Serialize;
use std::{collections::HashSet, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    pub kind: SpecKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// `import ... from '...'`
    Import,
    /// `export ... from '...'`
    ReExport,
    /// `require('...')`
    Require,
}

/// One analyzed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    /// Workspace-relative path, `/`-separated. Unique within a graph.
    pub id: String,
    pub file_path: PathBuf,
    /// Ids of resolved imports, in extraction order (duplicates kept)
    pub dependencies: Vec<String>,
    pub has_cycle: bool,
}

/// `from` imports `to`. Both ends are ids of nodes in the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes nothing else imports. When every node is imported by another
    /// one (e.g. the whole graph is a cycle), all nodes are returned.
    pub fn roots(&self) -> Vec<&DependencyNode> {
        let imported: HashSet<&str> = self.edges.iter().map(|e| e.to.as_str()).collect();
        let roots: Vec<&DependencyNode> =
            self.nodes.iter().filter(|n| !imported.contains(n.id.as_str())).collect();
        if roots.is_empty() { self.nodes.iter().collect() } else { roots }
    }

    pub fn cyclic_nodes(&self) -> Vec<&DependencyNode> {
        self.nodes.iter().filter(|n| n.has_cycle).collect()
    }

    pub fn has_cycles(&self) -> bool {
        self.nodes.iter().any(|n| n.has_cycle)
    }
}
