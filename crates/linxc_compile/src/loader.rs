//! Include-directory resolution (`spec.md` §6's `fullPathFromIncludeName`).
//!
//! Mirrors the original `LinxcParser::FullPathFromIncludeName`: include
//! directories are searched in registration order, each candidate is
//! `dir/includeName`, and the first one that exists on disk wins. No
//! caching beyond what the filesystem itself does — unlike a remote
//! module registry, stat-ing a local directory tree is cheap enough that
//! a `Loader`-style URI cache would only add bookkeeping for no benefit.

use std::path::{Path, PathBuf};

/// Searches `include_dirs` in order for `include_name`, returning the
/// first candidate path that exists. `stdlib_dir` (if set) is searched
/// last, after every directory the driver registered via
/// `addIncludeDir` — the standard library is always the fallback, never
/// the primary source of a name.
pub fn resolve_include(
    include_dirs: &[PathBuf],
    stdlib_dir: Option<&Path>,
    include_name: &str,
) -> Option<PathBuf> {
    for dir in include_dirs {
        let candidate = dir.join(include_name);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    if let Some(stdlib) = stdlib_dir {
        let candidate = stdlib.join(include_name);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_file_in_first_matching_directory() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        fs::write(dir_b.path().join("Linxc.h"), "").unwrap();

        let dirs = vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];
        let found = resolve_include(&dirs, None, "Linxc.h").unwrap();
        assert_eq!(found, dir_b.path().join("Linxc.h"));
    }

    #[test]
    fn prefers_an_earlier_include_dir_over_a_later_one() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        fs::write(dir_a.path().join("foo.h"), "a").unwrap();
        fs::write(dir_b.path().join("foo.h"), "b").unwrap();

        let dirs = vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];
        let found = resolve_include(&dirs, None, "foo.h").unwrap();
        assert_eq!(found, dir_a.path().join("foo.h"));
    }

    #[test]
    fn falls_back_to_the_stdlib_directory_last() {
        let dir_a = tempdir().unwrap();
        let stdlib = tempdir().unwrap();
        fs::write(stdlib.path().join("Linxc.h"), "").unwrap();

        let dirs = vec![dir_a.path().to_path_buf()];
        let found = resolve_include(&dirs, Some(stdlib.path()), "Linxc.h").unwrap();
        assert_eq!(found, stdlib.path().join("Linxc.h"));
    }

    #[test]
    fn returns_none_when_no_directory_has_the_file() {
        let dir_a = tempdir().unwrap();
        let dirs = vec![dir_a.path().to_path_buf()];
        assert!(resolve_include(&dirs, None, "missing.h").is_none());
    }
}
