//! Path algebra over `/`-joined catalog keys.

/// Join a path prefix and a key, treating an empty prefix as the root.
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

/// Leading segment of a path (`"a/b/c"` yields `"a"`).
pub fn head(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

/// Strict prefixes of a path, shortest first (`"a/b/c"` yields `["a", "a/b"]`).
pub fn strict_prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').collect();
    (1..segments.len())
        .map(|len| segments[..len].join("/"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_treats_empty_prefix_as_root() {
        assert_eq!(join("", "unit"), "unit");
        assert_eq!(join("unit", "a"), "unit/a");
    }

    #[test]
    fn head_returns_leading_segment() {
        assert_eq!(head("unit/a/b"), "unit");
        assert_eq!(head("unit"), "unit");
    }

    #[test]
    fn strict_prefixes_exclude_the_path_itself() {
        assert_eq!(strict_prefixes("a/b/c"), vec!["a", "a/b"]);
        assert!(strict_prefixes("a").is_empty());
    }
}
