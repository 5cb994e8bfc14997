use crate::fs::error::{FsError, FsResult};

/// Ordered list of absolute backing-directory paths.
///
/// Fixed at startup and never mutated afterwards; the list order is the
/// only ordering guarantee the overlay makes.
#[derive(Debug, Clone)]
pub struct BackingRoots {
    roots: Vec<String>,
}

impl BackingRoots {
    /// Validate and normalize the configured roots. Each entry must be
    /// absolute; trailing separator runs are stripped.
    pub fn new(roots: Vec<String>) -> FsResult<Self> {
        if roots.is_empty() {
            return Err(FsError::InvalidArgument("No backing roots configured".to_string()));
        }

        let mut cleaned = Vec::with_capacity(roots.len());
        for root in roots {
            if !root.starts_with('/') {
                return Err(FsError::InvalidArgument(format!(
                    "Backing root must be absolute: {root}"
                )));
            }

            let trimmed = root.trim_end_matches('/');
            if trimmed.is_empty() {
                return Err(FsError::InvalidArgument(
                    "The filesystem root cannot be a backing root".to_string(),
                ));
            }

            cleaned.push(trimmed.to_string());
        }

        Ok(Self { roots: cleaned })
    }

    /// The first root in search order; directory listings come only from
    /// here.
    pub fn primary(&self) -> &str {
        &self.roots[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
