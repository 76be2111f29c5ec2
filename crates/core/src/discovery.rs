use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::error::{AstgenError, Result};

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Expands `pattern` into a deduplicated set of existing files.
///
/// A pattern without glob metacharacters is treated as a literal path and
/// resolves to itself when it names a file, or the empty set otherwise.
/// Directories are silently excluded. Zero matches is not an error; callers
/// that require at least one file decide that for themselves.
pub fn find_files(pattern: &str) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();

    if !pattern.contains(GLOB_META) {
        let path = Path::new(pattern);
        if path.is_file() {
            files.insert(path.to_path_buf());
        }
        return Ok(files);
    }

    let (root, glob) = split_pattern(pattern);

    let mut overrides = OverrideBuilder::new(&root);
    overrides
        .add(&glob)
        .map_err(|e| AstgenError::Pattern(e.to_string()))?;
    let overrides = overrides
        .build()
        .map_err(|e| AstgenError::Pattern(e.to_string()))?;

    // Standard filters off: glob expansion must see hidden and
    // VCS-ignored files alike.
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .overrides(overrides)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| AstgenError::Pattern(e.to_string()))?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.insert(entry.into_path());
        }
    }

    Ok(files)
}

/// Splits a glob pattern into its longest literal directory prefix (the walk
/// root) and the remaining glob, anchored to that root.
fn split_pattern(pattern: &str) -> (PathBuf, String) {
    let mut root = PathBuf::new();
    let mut rest: Vec<&str> = Vec::new();
    let mut in_glob = false;

    for (index, part) in pattern.split('/').enumerate() {
        if part.is_empty() {
            if index == 0 {
                root.push("/");
            }
            continue;
        }
        if in_glob || part.contains(GLOB_META) {
            in_glob = true;
            rest.push(part);
        } else {
            root.push(part);
        }
    }

    if root.as_os_str().is_empty() {
        root.push(".");
    }

    // The leading slash anchors the glob at the walk root, so "*.java"
    // stays single-level instead of matching at any depth.
    (root, format!("/{}", rest.join("/")))
}
