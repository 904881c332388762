//! Leaf filtering for filesystem sources: glob excludes and OS junk files.

use std::path::Path;

/// Files the OS scatters around that nobody wants indexed.
pub fn is_os_junk(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" | "$RECYCLE.BIN" => true,
            // Linux
            ".directory" => true,
            // macOS resource fork files start with ._
            _ => name.starts_with("._"),
        },
        None => false,
    }
}

/// Returns true if the leaf qualifies for indexing: not OS junk and not
/// matched by any exclude pattern (checked against both the file name and
/// the full path).
pub fn should_index(path: &Path, exclude_patterns: &[String]) -> bool {
    if is_os_junk(path) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    for pattern in exclude_patterns {
        if glob_match(pattern, name) || glob_match(pattern, path_str) {
            return false;
        }
    }
    true
}

/// Simple glob pattern matching (supports * and ?).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    // Leading '!' is stripped; negation is the caller's concern.
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    matches(&p, &t)
}

fn matches(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'*', rest)) => {
            if rest.is_empty() {
                return true; // trailing * matches everything
            }
            (0..=text.len()).any(|i| matches(rest, &text[i..]))
        }
        Some((&'?', rest)) => !text.is_empty() && matches(rest, &text[1..]),
        Some((&c, rest)) => text
            .split_first()
            .is_some_and(|(&tc, tr)| tc == c && matches(rest, tr)),
    }
}
