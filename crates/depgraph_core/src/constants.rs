//! Constants shared by collection, resolution and ignore-pattern handling.
//!
//! ## Supported Extensions
//!
//! Only the four classic source extensions take part in the graph:
//! `.ts`, `.tsx`, `.js` and `.jsx`. The same list (in the same order) is
//! used to build inclusion globs and to try candidate files during module
//! resolution, so `foo.ts` always wins over `foo.js`.

/// Source file extensions analyzed and tried during resolution (in priority order)
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// File stem tried when a specifier points at a directory
pub const INDEX_STEM: &str = "index";

/// Specifier prefix mapped onto [`ALIAS_ROOT`]
pub const ALIAS_PREFIX: &str = "@/";

/// Directory (relative to the workspace root) the alias prefix points at
pub const ALIAS_ROOT: &str = "src";

/// Analyzer-specific ignore file, consulted before the VCS ignore file
pub const PROJECT_IGNORE_FILE: &str = ".depgraphignore";

/// Standard VCS ignore file, used when the project ignore file yields nothing
pub const VCS_IGNORE_FILE: &str = ".gitignore";

/// Workspace settings file carrying the explicit exclude list
pub const SETTINGS_FILE: &str = ".depgraph.json";

/// Exclusion patterns used when no other source produced any
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/out/**",
    "**/dist/**",
    "**/*.d.ts",
    "**/coverage/**",
    "**/*.spec.ts",
    "**/*.spec.tsx",
    "**/*.spec.js",
    "**/*.spec.jsx",
    "**/*.test.ts",
    "**/*.test.tsx",
    "**/*.test.js",
    "**/*.test.jsx",
    "**/tests/**",
    "**/test/**",
    "**/__tests__/**",
    "**/__mocks__/**",
    "**/.git/**",
    "**/.vscode/**",
    "**/.idea/**",
    "**/build/**",
    "**/temp/**",
    "**/tmp/**",
    "**/*.log",
    "**/.DS_Store",
];
