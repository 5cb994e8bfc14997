use crate::fs::error::FsError;
use crate::fs::path;
use crate::fs::roots::BackingRoots;
use std::fs::Metadata;

/// Outcome of searching the backing roots for one virtual path.
#[derive(Debug)]
pub enum Resolution {
    /// The path exists under the first matching root in list order;
    /// `real_path` is that root joined with the virtual path.
    Hit { real_path: String, metadata: Metadata },
    /// No root contains the path.
    Miss,
    /// A lookup failed with something other than a keep-searching class.
    Failure(FsError),
}

/// Search the backing roots in order for `virtual_path`.
///
/// The first successful metadata query wins and later roots are never
/// consulted. A missing or not-a-directory result moves on to the next
/// root; any other failure abandons the search immediately. Ill-formed
/// virtual paths are rejected before any root is touched.
pub fn resolve(roots: &BackingRoots, virtual_path: &str) -> Resolution {
    if !path::is_wellformed(virtual_path) {
        return Resolution::Miss;
    }

    for root in roots.iter() {
        let real_path = path::join_real(root, virtual_path);

        match std::fs::metadata(&real_path) {
            Ok(metadata) => return Resolution::Hit { real_path, metadata },
            Err(err) => match err.raw_os_error() {
                Some(libc::ENOENT) | Some(libc::ENOTDIR) => continue,
                _ => return Resolution::Failure(FsError::from_io(&err, &real_path)),
            },
        }
    }

    Resolution::Miss
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;

    fn roots_for(dirs: &[&tempfile::TempDir]) -> BackingRoots {
        BackingRoots::new(dirs.iter().map(|d| d.path().display().to_string()).collect()).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("x"), b"from a").unwrap();
        std::fs::write(b.path().join("x"), b"from b").unwrap();

        let roots = roots_for(&[&a, &b]);
        match resolve(&roots, "/x") {
            Resolution::Hit { real_path, .. } => {
                assert_eq!(real_path, format!("{}/x", a.path().display()));
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn test_fallthrough_to_later_root() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(b.path().join("x"), b"from b").unwrap();

        let roots = roots_for(&[&a, &b]);
        match resolve(&roots, "/x") {
            Resolution::Hit { real_path, metadata } => {
                assert_eq!(real_path, format!("{}/x", b.path().display()));
                assert!(!metadata.is_dir());
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn test_miss_when_nowhere() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();

        let roots = roots_for(&[&a, &b]);
        assert!(matches!(resolve(&roots, "/missing"), Resolution::Miss));
    }

    #[test]
    fn test_not_a_directory_keeps_searching() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("x"), b"a file, not a dir").unwrap();
        std::fs::create_dir(b.path().join("x")).unwrap();
        std::fs::write(b.path().join("x/y"), b"nested").unwrap();

        let roots = roots_for(&[&a, &b]);
        match resolve(&roots, "/x/y") {
            Resolution::Hit { real_path, .. } => {
                assert_eq!(real_path, format!("{}/x/y", b.path().display()));
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_hit() {
        let a = tempfile::tempdir().unwrap();
        std::fs::create_dir(a.path().join("dir")).unwrap();

        let roots = roots_for(&[&a]);
        match resolve(&roots, "/dir") {
            Resolution::Hit { metadata, .. } => assert!(metadata.is_dir()),
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn test_ill_formed_paths_resolve_to_miss() {
        let a = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("x"), b"data").unwrap();

        let roots = roots_for(&[&a]);
        assert!(matches!(resolve(&roots, ""), Resolution::Miss));
        assert!(matches!(resolve(&roots, "x"), Resolution::Miss));
        assert!(matches!(resolve(&roots, "x/y"), Resolution::Miss));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let a = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("x"), b"data").unwrap();

        let roots = roots_for(&[&a]);
        let first = resolve(&roots, "/x");
        let second = resolve(&roots, "/x");
        match (first, second) {
            (
                Resolution::Hit { real_path: p1, metadata: m1 },
                Resolution::Hit { real_path: p2, metadata: m2 },
            ) => {
                assert_eq!(p1, p2);
                assert_eq!(m1.ino(), m2.ino());
                assert_eq!(m1.len(), m2.len());
            }
            other => panic!("expected two hits, got {other:?}"),
        }
    }
}
