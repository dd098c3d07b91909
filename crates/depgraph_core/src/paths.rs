use std::path::{Component, Path, PathBuf};

/// Create a relative path from `base` to `target`
pub fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                // target is an ancestor of base
                base_parts.push(b);
                break;
            }
            (None, None) => {
                return Some(PathBuf::from("."));
            }
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    if common_prefix_len == 0 && target.components().next() != base.components().next() {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

/// Graph id of `path`: its location relative to `root`, `/`-separated.
///
/// Falls back to the path itself when no relative form exists (different
/// drive prefixes on Windows).
pub fn workspace_id(root: &Path, path: &Path) -> String {
    let relative = make_relative(path, root).unwrap_or_else(|| path.to_path_buf());
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
