//! Target-name normalization and collision-avoiding naming for saved files.

use std::path::PathBuf;

/// Appends `extension` unless `file_name` already ends with it.
pub(crate) fn normalized(file_name: &str, extension: &str) -> PathBuf {
    if file_name.ends_with(extension) {
        PathBuf::from(file_name)
    } else {
        PathBuf::from(format!("{file_name}{extension}"))
    }
}

/// Resolves the path a save should write to.
///
/// The name is normalized to end in `extension`. With `rewrite` set the
/// normalized path is used as-is; otherwise an existing target gets a
/// parenthesized ordinal before the extension, ` (1)`, ` (2)`, ..., until
/// an unused name is found.
pub(crate) fn save_target(file_name: &str, extension: &str, rewrite: bool) -> PathBuf {
    let base = file_name.strip_suffix(extension).unwrap_or(file_name);
    let candidate = PathBuf::from(format!("{base}{extension}"));
    if rewrite || !candidate.exists() {
        return candidate;
    }
    let mut ordinal = 1u32;
    loop {
        let candidate = PathBuf::from(format!("{base} ({ordinal}){extension}"));
        if !candidate.exists() {
            return candidate;
        }
        ordinal += 1;
    }
}
