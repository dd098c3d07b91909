use dashmap::DashMap;
use log::trace;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

use crate::constants::{ALIAS_PREFIX, ALIAS_ROOT, INDEX_STEM, SOURCE_EXTENSIONS};

/// Maps `request`, as written in `from_file`, to a file on disk.
///
/// Resolution order:
/// 1. `.`-prefixed requests resolve against the directory of `from_file`
/// 2. `@/` requests resolve against `<root>/src`
/// 3. bare package names (no `/`) and other `@scope/...` requests are
///    external and never resolve
/// 4. anything else containing `/` resolves against `root`
///
/// The base path is then tried with each supported extension, then as a
/// directory with an `index` file. Build-tool path mappings are not
/// consulted.
pub fn resolve_specifier(request: &str, from_file: &Path, root: &Path) -> Option<PathBuf> {
    let base = if request.starts_with('.') {
        let dir = from_file.parent().unwrap_or(root);
        dir.join(request).clean()
    } else if let Some(rest) = request.strip_prefix(ALIAS_PREFIX) {
        root.join(ALIAS_ROOT).join(rest).clean()
    } else if !request.contains('/') || request.starts_with('@') {
        trace!("Skipping external module '{}'", request);
        return None;
    } else {
        root.join(request).clean()
    };

    let resolved = find_actual_file(&base);
    match &resolved {
        Some(p) => trace!("Resolved '{}' to {}", request, p.display()),
        None => trace!("Failed to resolve '{}' from {}", request, from_file.display()),
    }
    resolved
}

fn find_actual_file(base: &Path) -> Option<PathBuf> {
    for ext in SOURCE_EXTENSIONS {
        let mut candidate = base.as_os_str().to_os_string();
        candidate.push(".");
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for ext in SOURCE_EXTENSIONS {
        let candidate = base.join(format!("{}.{}", INDEX_STEM, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

/// Per-analysis resolver with a memo of previous lookups.
///
/// Requests are cached per referencing directory, so sibling files importing
/// the same module only hit the file system once.
#[derive(Debug)]
pub struct ModuleResolver {
    root: PathBuf,
    cache: DashMap<(PathBuf, String), Option<PathBuf>>,
}

impl ModuleResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: DashMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, request: &str, from_file: &Path) -> Option<PathBuf> {
        let dir = from_file.parent().unwrap_or(&self.root).to_path_buf();
        let key = (dir, request.to_string());
        if let Some(v) = self.cache.get(&key) {
            trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
            return v.clone();
        }

        let resolved = resolve_specifier(request, from_file, &self.root);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }
}
