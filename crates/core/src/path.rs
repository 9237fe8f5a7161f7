//! Path and prefix normalization
//!
//! A local tree is hierarchical, an object store keyspace is flat. The
//! helpers here canonicalize the strings that cross that boundary so the
//! rest of the engine never sees trailing slashes, leading slashes in
//! object keys, or file overrides that still carry directory components.

use std::path::Path;

/// Strip exactly one trailing `/` if present.
///
/// Idempotent: a path that already lost its trailing slash is unchanged.
pub fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Strip exactly one leading `/` if present.
///
/// Object-store keys never begin with a slash; restore source paths given
/// in absolute form are rewritten before any listing call.
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Fold the directory component of a file override into the base path.
///
/// A `--file sub/dir/name.txt` override combined with `--path root` becomes
/// path `root/sub/dir` and file `name.txt`. Overrides that are empty or
/// `"."` are returned untouched.
pub fn split_file_override(path: &str, file: &str) -> (String, String) {
    if file.is_empty() || file == "." {
        return (path.to_string(), file.to_string());
    }

    let file_path = Path::new(file);
    let base = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());

    let dir = file_path.parent().unwrap_or_else(|| Path::new(""));
    let joined = if dir.as_os_str().is_empty() {
        path.to_string()
    } else {
        Path::new(path).join(dir).to_string_lossy().into_owned()
    };

    (joined, base)
}

/// Remove `prefix` from the front of `key` when present.
///
/// Used on restore to map object keys back to paths relative to the
/// destination directory. Keys that do not start with the prefix are
/// returned unchanged.
pub fn strip_key_prefix<'a>(key: &'a str, prefix: &str) -> &'a str {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Append a trailing `/` to a non-empty prefix that lacks one.
///
/// The slash scopes a flat-keyspace listing to the children of a logical
/// directory. The empty prefix (whole bucket) stays empty.
pub fn ensure_trailing_slash(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    }
}

/// Join two key segments with exactly one `/` between them.
pub fn join_key(prefix: &str, rest: &str) -> String {
    let prefix = trim_trailing_slash(prefix);
    let rest = strip_leading_slash(rest);
    if prefix.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{rest}")
    }
}
