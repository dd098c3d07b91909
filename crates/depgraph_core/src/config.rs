use anyhow::{Result, anyhow};
use log::{debug, trace, warn};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::constants::SETTINGS_FILE;

/// Workspace-level analyzer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Explicit exclusion globs; when non-empty they replace every ignore file
    #[serde(default)]
    pub exclude: Vec<String>,
}

pub fn find_git_root() -> Result<PathBuf> {
    debug!("Searching for git root");
    let mut current_dir = env::current_dir()?;
    trace!("Starting search from: {:?}", current_dir);

    loop {
        let git_dir = current_dir.join(".git");
        trace!("Checking for .git at: {:?}", git_dir);
        if git_dir.exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Ok(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                debug!("Could not find .git directory in any parent folder");
                return Err(anyhow!("Could not find .git directory in any parent folder"));
            }
        }
    }
}

/// Reads `<root>/.depgraph.json`. A missing or malformed file yields the
/// default (empty) settings.
pub fn read_settings(root: &Path) -> Settings {
    let path = root.join(SETTINGS_FILE);
    if !path.is_file() {
        trace!("No settings file at {:?}", path);
        return Settings::default();
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&strip_line_comments(&content)) {
        Ok(settings) => {
            debug!("Loaded {} exclude patterns from {}", settings.exclude.len(), path.display());
            settings
        }
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

/// Drops `//` comments outside of string literals so editor-style JSON parses.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut in_string = false;
            let mut escaped = false;
            let bytes = line.as_bytes();
            for (i, byte) in bytes.iter().enumerate() {
                match *byte {
                    _ if escaped => escaped = false,
                    b'\\' if in_string => escaped = true,
                    b'"' => in_string = !in_string,
                    b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
                    _ => {}
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
