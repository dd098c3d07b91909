//! Exclusion-pattern resolution.
//!
//! The effective exclusion list comes from exactly one of four sources,
//! first non-empty one wins:
//!
//! 1. the explicit `exclude` setting
//! 2. `.depgraphignore` in the workspace root
//! 3. `.gitignore` in the workspace root
//! 4. [`DEFAULT_EXCLUDE_PATTERNS`]
//!
//! Tiers are never merged.

use log::{debug, trace, warn};
use std::{fmt, fs, path::Path};

use crate::constants::{DEFAULT_EXCLUDE_PATTERNS, PROJECT_IGNORE_FILE, VCS_IGNORE_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    Settings,
    ProjectIgnoreFile,
    VcsIgnoreFile,
    Defaults,
}

impl fmt::Display for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSource::Settings => write!(f, "settings"),
            PatternSource::ProjectIgnoreFile => write!(f, "{}", PROJECT_IGNORE_FILE),
            PatternSource::VcsIgnoreFile => write!(f, "{}", VCS_IGNORE_FILE),
            PatternSource::Defaults => write!(f, "defaults"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPatterns {
    pub source: PatternSource,
    pub patterns: Vec<String>,
}

pub fn resolve_exclude_patterns(root: &Path, configured: &[String]) -> ResolvedPatterns {
    let from_settings: Vec<String> = configured
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(normalize_pattern)
        .collect();
    if !from_settings.is_empty() {
        debug!("Using {} exclude patterns from settings", from_settings.len());
        return ResolvedPatterns { source: PatternSource::Settings, patterns: from_settings };
    }

    for (file_name, source) in [
        (PROJECT_IGNORE_FILE, PatternSource::ProjectIgnoreFile),
        (VCS_IGNORE_FILE, PatternSource::VcsIgnoreFile),
    ] {
        let patterns = read_ignore_file(&root.join(file_name));
        if !patterns.is_empty() {
            debug!("Using {} exclude patterns from {}", patterns.len(), file_name);
            return ResolvedPatterns { source, patterns };
        }
        trace!("{} produced no patterns, falling through", file_name);
    }

    debug!("Using default exclude patterns");
    ResolvedPatterns {
        source: PatternSource::Defaults,
        patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
    }
}

/// Missing and unreadable files both count as "no patterns".
fn read_ignore_file(path: &Path) -> Vec<String> {
    if !path.is_file() {
        trace!("Ignore file not found: {:?}", path);
        return Vec::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_ignore_file(&content),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Parses ignore-file content into exclusion globs.
///
/// `!pattern` removes matching patterns collected so far (compared both raw
/// and normalized, with or without a leading `**/`) and is never emitted.
pub fn parse_ignore_file(content: &str) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(negated) = trimmed.strip_prefix('!') {
            let normalized = normalize_pattern(negated);
            let cancelled = [
                negated.to_string(),
                format!("**/{}", negated),
                normalized.clone(),
                format!("**/{}", normalized),
            ];
            let before = patterns.len();
            patterns.retain(|p| !cancelled.contains(p));
            trace!("Negation '{}' removed {} patterns", trimmed, before - patterns.len());
            continue;
        }

        patterns.push(normalize_pattern(trimmed));
    }

    patterns
}

/// Directory patterns (`foo/`) match everything below; bare names
/// (no `/`, no `*`) match that name at any depth.
pub fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim();
    if pattern.ends_with('/') {
        return format!("{}**", pattern);
    }
    if !pattern.contains('/') && !pattern.contains('*') {
        return format!("**/{}/**", pattern);
    }
    pattern.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn strings(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_normalize_directory_pattern() {
        assert_eq!(normalize_pattern("coverage/"), "coverage/**");
        assert_eq!(normalize_pattern("src/generated/"), "src/generated/**");
    }

    #[test]
    fn test_normalize_bare_name() {
        assert_eq!(normalize_pattern("dist"), "**/dist/**");
        assert_eq!(normalize_pattern(".env"), "**/.env/**");
    }

    #[test]
    fn test_normalize_leaves_globs_alone() {
        assert_eq!(normalize_pattern("*.log"), "*.log");
        assert_eq!(normalize_pattern("**/*.spec.ts"), "**/*.spec.ts");
        assert_eq!(normalize_pattern("test/**"), "test/**");
        assert_eq!(normalize_pattern("src/legacy.ts"), "src/legacy.ts");
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "\n# Comment line\n   \n# another\n";
        assert!(parse_ignore_file(content).is_empty());
    }

    #[test]
    fn test_parse_mixed_patterns() {
        let content = "# deps\nnode_modules/\ndist\n*.spec.ts\ntest/**\n";
        assert_eq!(
            parse_ignore_file(content),
            strings(&["node_modules/**", "**/dist/**", "*.spec.ts", "test/**"])
        );
    }

    #[test]
    fn test_negation_cancels_identical_pattern() {
        assert!(parse_ignore_file("pattern/\n!pattern/\n").is_empty());
    }

    #[test]
    fn test_negation_matches_with_double_star_prefix() {
        let content = "**/generated/**\n!generated/**\nkeep/**\n";
        assert_eq!(parse_ignore_file(content), strings(&["keep/**"]));
    }

    #[test]
    fn test_negation_of_bare_name() {
        let content = "vendor\n!vendor\n";
        assert!(parse_ignore_file(content).is_empty());
    }

    #[test]
    fn test_negation_only_affects_earlier_patterns() {
        let content = "!test/unit/**\ntest/unit/**\n";
        assert_eq!(parse_ignore_file(content), strings(&["test/unit/**"]));
    }

    #[test]
    fn test_negation_without_match_is_dropped() {
        let content = "test/**\n!test/unit/**\n*.spec.ts\n!important.spec.ts\n";
        assert_eq!(parse_ignore_file(content), strings(&["test/**", "*.spec.ts"]));
    }

    #[test]
    fn test_settings_take_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, PROJECT_IGNORE_FILE, "depgraph/**\n");
        create_test_file(root, VCS_IGNORE_FILE, "gitignore/**\n");

        let configured = strings(&["**/*.spec.ts", "test/**", "mock/", "fixtures"]);
        let resolved = resolve_exclude_patterns(root, &configured);
        assert_eq!(resolved.source, PatternSource::Settings);
        assert_eq!(
            resolved.patterns,
            strings(&["**/*.spec.ts", "test/**", "mock/**", "**/fixtures/**"])
        );
    }

    #[test]
    fn test_settings_do_not_apply_negation() {
        let temp_dir = TempDir::new().unwrap();
        let configured = strings(&["gen/**", "!gen/**"]);
        let resolved = resolve_exclude_patterns(temp_dir.path(), &configured);
        assert_eq!(resolved.source, PatternSource::Settings);
        assert_eq!(resolved.patterns.len(), 2);
        assert_eq!(resolved.patterns[0], "gen/**");
    }

    #[test]
    fn test_blank_settings_fall_through() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), PROJECT_IGNORE_FILE, "depgraph/**\n");
        let resolved = resolve_exclude_patterns(temp_dir.path(), &strings(&["", "   "]));
        assert_eq!(resolved.source, PatternSource::ProjectIgnoreFile);
    }

    #[test]
    fn test_project_ignore_file_shadows_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, PROJECT_IGNORE_FILE, "depgraph/**\n");
        create_test_file(root, VCS_IGNORE_FILE, "gitignore/**\n");

        let resolved = resolve_exclude_patterns(root, &[]);
        assert_eq!(resolved.source, PatternSource::ProjectIgnoreFile);
        assert_eq!(resolved.patterns, strings(&["depgraph/**"]));
        assert!(!resolved.patterns.iter().any(|p| p.contains("gitignore")));
    }

    #[test]
    fn test_comment_only_project_file_falls_back_to_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, PROJECT_IGNORE_FILE, "# nothing here\n\n");
        create_test_file(root, VCS_IGNORE_FILE, "node_modules\nbuild/\n*.log\n");

        let resolved = resolve_exclude_patterns(root, &[]);
        assert_eq!(resolved.source, PatternSource::VcsIgnoreFile);
        assert_eq!(resolved.patterns, strings(&["**/node_modules/**", "build/**", "*.log"]));
    }

    #[test]
    fn test_gitignore_used_when_project_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), VCS_IGNORE_FILE, "gitignore/**\n");

        let resolved = resolve_exclude_patterns(temp_dir.path(), &[]);
        assert_eq!(resolved.source, PatternSource::VcsIgnoreFile);
        assert_eq!(resolved.patterns, strings(&["gitignore/**"]));
    }

    #[test]
    fn test_defaults_when_nothing_else() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = resolve_exclude_patterns(temp_dir.path(), &[]);
        assert_eq!(resolved.source, PatternSource::Defaults);
        assert!(resolved.patterns.contains(&"**/node_modules/**".to_string()));
        assert!(resolved.patterns.contains(&"**/dist/**".to_string()));
        assert_eq!(resolved.patterns.len(), DEFAULT_EXCLUDE_PATTERNS.len());
    }

    #[test]
    fn test_defaults_when_every_file_cancels_itself() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, PROJECT_IGNORE_FILE, "a/\n!a/\n");
        create_test_file(root, VCS_IGNORE_FILE, "# only comments\n");

        let resolved = resolve_exclude_patterns(root, &[]);
        assert_eq!(resolved.source, PatternSource::Defaults);
    }

    #[test]
    fn test_unreadable_ignore_file_falls_through() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // A directory with the ignore file's name cannot be read as a file
        fs::create_dir_all(root.join(PROJECT_IGNORE_FILE)).unwrap();
        create_test_file(root, VCS_IGNORE_FILE, "out/\n");

        let resolved = resolve_exclude_patterns(root, &[]);
        assert_eq!(resolved.source, PatternSource::VcsIgnoreFile);
        assert_eq!(resolved.patterns, strings(&["out/**"]));
    }
}
