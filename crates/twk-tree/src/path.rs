#![forbid(unsafe_code)]

//! Slash-delimited path handling.
//!
//! A path is an absolute, slash-separated string key; segments are
//! display names. The root folder has the empty path. Paths are the
//! sole identity used for tree lookup and persistence matching.

/// The display name of a path: its last segment.
///
/// The empty (root) path displays as `"root"`.
#[must_use]
pub fn leaf_name(path: &str) -> &str {
    if path.is_empty() {
        return "root";
    }
    path.rsplit('/').next().unwrap_or(path)
}

/// The parent path, or `None` for the root.
///
/// The parent of a single-segment path is the root (empty) path.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once('/').map_or("", |(head, _)| head))
}

/// Iterate the segments of a path, skipping empty ones.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Join a prefix and a relative path with a single slash.
#[must_use]
pub fn join(prefix: &str, rest: &str) -> String {
    if prefix.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{rest}")
    }
}

/// Every proper ancestor path of `path`, nearest last, excluding root.
///
/// `"a/b/c"` yields `["a", "a/b"]`.
#[must_use]
pub fn ancestors(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for (i, ch) in path.char_indices() {
        if ch == '/' {
            out.push(&path[..i]);
        }
    }
    out
}
