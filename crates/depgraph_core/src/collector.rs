use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log::{debug, error, trace, warn};
use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{constants::SOURCE_EXTENSIONS, notify::Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFailure {
    PermissionDenied,
    Other,
}

pub fn classify_scan_error(err: &ignore::Error) -> ScanFailure {
    match err.io_error() {
        Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
            ScanFailure::PermissionDenied
        }
        _ => ScanFailure::Other,
    }
}

/// Inclusion globs for a run.
///
/// Without a filter every supported source file is included. A filter is a
/// comma-separated list; fragments that are not already file globs (no `*.`)
/// expand to one pattern per supported extension below that fragment.
/// Fragments are taken relative to the workspace root: leading `/` and `./`
/// and trailing `/` are dropped, and a fragment naming the root itself
/// selects every source file.
pub fn build_include_patterns(filter: Option<&str>) -> Vec<String> {
    let fragments: Vec<&str> = filter
        .map(|f| f.split(',').map(str::trim).filter(|f| !f.is_empty()).collect())
        .unwrap_or_default();

    if fragments.is_empty() {
        return all_sources_patterns();
    }

    fragments
        .into_iter()
        .flat_map(|fragment| {
            let fragment = normalize_fragment(fragment);
            if fragment.is_empty() {
                all_sources_patterns()
            } else if fragment.contains("*.") {
                vec![fragment.to_string()]
            } else {
                SOURCE_EXTENSIONS.iter().map(|ext| format!("{}/**/*.{}", fragment, ext)).collect()
            }
        })
        .collect()
}

fn all_sources_patterns() -> Vec<String> {
    SOURCE_EXTENSIONS.iter().map(|ext| format!("**/*.{}", ext)).collect()
}

/// `./src/`, `/src` and `src` all name the same directory.
fn normalize_fragment(fragment: &str) -> &str {
    let mut fragment = fragment.trim();
    loop {
        if let Some(rest) = fragment.strip_prefix("./") {
            fragment = rest;
        } else if let Some(rest) = fragment.strip_prefix('/') {
            fragment = rest;
        } else {
            break;
        }
    }
    let fragment = fragment.trim_end_matches('/');
    if fragment == "." { "" } else { fragment }
}

/// Globs where `*` stays within one path segment; invalid globs are skipped.
fn build_glob_set<'a>(patterns: impl IntoIterator<Item = &'a str>) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Skipping invalid glob '{}': {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Failed to compile glob set: {}", e);
        GlobSet::empty()
    })
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Expands inclusion globs (see [`build_include_patterns`]) minus `exclude`
/// into a sorted, de-duplicated list of absolute file paths under `root`.
///
/// Symbolic links are not followed, dot entries are skipped and excluded
/// directories are pruned during the walk. If the walk fails the problem is
/// reported once through `notifier` and an empty list is returned.
pub fn collect_files(
    root: &Path,
    filter: Option<&str>,
    exclude: &[String],
    notifier: &dyn Notifier,
) -> Vec<PathBuf> {
    let include_patterns = build_include_patterns(filter);
    debug!("Collecting files with patterns: {:?}", include_patterns);
    debug!("Exclude patterns: {:?}", exclude);

    let include = build_glob_set(include_patterns.iter().map(String::as_str));
    let excluded = build_glob_set(exclude.iter().map(String::as_str));
    // `foo/**` excludes everything below `foo`, so the directory itself can be pruned
    let excluded_dirs = build_glob_set(
        exclude
            .iter()
            .filter_map(|p| p.strip_suffix("/**"))
            .filter(|p| !p.is_empty()),
    );

    let walk_root = root.to_path_buf();
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).hidden(true).follow_links(false).filter_entry(move |entry| {
        if entry.depth() == 0 {
            return true;
        }
        let Some(rel) = relative_path(&walk_root, entry.path()) else {
            return true;
        };
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        let skip = if is_dir {
            excluded_dirs.is_match(&rel) || excluded.is_match(&rel)
        } else {
            excluded.is_match(&rel)
        };
        if skip {
            trace!("Excluded: {}", rel);
        }
        !skip
    });

    let mut files: Vec<PathBuf> = Vec::new();
    for res in builder.build() {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                report_scan_failure(&e, notifier);
                return Vec::new();
            }
        };

        // Symlinks report their own type since links are not followed
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = dent.path();
        match relative_path(root, path) {
            Some(rel) if include.is_match(&rel) => {
                trace!("Collected: {}", rel);
                files.push(path.to_path_buf());
            }
            _ => {}
        }
    }

    files.sort();
    files.dedup();
    debug!("Collected {} files under {}", files.len(), root.display());
    files
}

fn report_scan_failure(err: &ignore::Error, notifier: &dyn Notifier) {
    error!("Error collecting files: {}", err);
    let message = match classify_scan_error(err) {
        ScanFailure::PermissionDenied => "Permission denied while scanning the workspace for the \
             dependency graph. Make sure only files inside the workspace are scanned."
            .to_string(),
        ScanFailure::Other => {
            format!("Failed to scan the workspace for the dependency graph: {}", err)
        }
    };
    notifier.warn(&message);
}
