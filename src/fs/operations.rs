use crate::fs::attr::FileAttr;
use crate::fs::error::{FsError, FsResult};
use crate::fs::path;
use crate::fs::resolver::{self, Resolution};
use crate::fs::roots::BackingRoots;

/// Receives directory entry names during enumeration. `push` returns
/// whether the collector can accept more entries.
pub trait EntryCollector {
    fn push(&mut self, name: &str) -> bool;
}

/// The overlay core: the three protocol operations over an ordered set of
/// backing roots. Holds no mutable state, so concurrent requests need no
/// locks.
pub struct OverlayFs {
    roots: BackingRoots,
}

impl OverlayFs {
    pub fn new(roots: BackingRoots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &BackingRoots {
        &self.roots
    }

    /// Attribute query. Directories pass through with their real metadata;
    /// anything else is presented as a symlink to its real location.
    pub fn get_attr(&self, path: &str) -> FsResult<FileAttr> {
        match resolver::resolve(&self.roots, path) {
            Resolution::Hit { real_path, metadata } => {
                if metadata.is_dir() {
                    Ok(FileAttr::from_metadata(&metadata))
                } else {
                    Ok(FileAttr::link_to(&real_path, &metadata))
                }
            }
            Resolution::Miss => Err(FsError::NotFound(path.to_string())),
            Resolution::Failure(err) => Err(err),
        }
    }

    /// Link-target query. Only non-directory hits are links. The target is
    /// never truncated to fit `capacity`; an over-long target fails whole.
    pub fn read_link(&self, path: &str, capacity: usize) -> FsResult<String> {
        if capacity == 0 {
            return Err(FsError::InvalidArgument(format!("Zero-capacity link buffer for {path}")));
        }

        match resolver::resolve(&self.roots, path) {
            Resolution::Hit { real_path, metadata } => {
                if metadata.is_dir() {
                    return Err(FsError::NotALink(path.to_string()));
                }
                if real_path.is_empty() {
                    return Err(FsError::InvalidArgument(format!("Empty link target for {path}")));
                }
                if real_path.len() > capacity {
                    return Err(FsError::InsufficientCapacity {
                        needed: real_path.len(),
                        capacity,
                    });
                }
                Ok(real_path)
            }
            Resolution::Miss => Err(FsError::NotALink(path.to_string())),
            Resolution::Failure(err) => Err(err),
        }
    }

    /// Directory enumeration, strictly from the primary root. Entries that
    /// exist only under other roots are not merged in.
    pub fn read_dir(&self, path: &str, collector: &mut dyn EntryCollector) -> FsResult<()> {
        if !path::is_wellformed(path) {
            return Err(FsError::NotFound(path.to_string()));
        }

        let real_path = path::join_real(self.roots.primary(), path);
        let Ok(entries) = std::fs::read_dir(&real_path) else {
            return Err(FsError::NotFound(path.to_string()));
        };

        for entry in entries {
            let entry = entry.map_err(|err| FsError::from_io(&err, &real_path))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !collector.push(&name) {
                break;
            }
        }

        Ok(())
    }
}
