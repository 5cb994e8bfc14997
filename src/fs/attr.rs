use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

/// File type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    RegularFile,
    Directory,
    Symlink,
}

/// File attributes structure
#[derive(Debug, Clone)]
pub struct FileAttr {
    pub inode: u64,
    pub kind: FileType,
    pub size: u64,
    pub atime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlinks: u32,
}

impl FileAttr {
    /// Real metadata carried over field for field; used for directory hits,
    /// which are never disguised.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let kind = if file_type.is_dir() {
            FileType::Directory
        } else if file_type.is_symlink() {
            FileType::Symlink
        } else {
            FileType::RegularFile
        };

        Self {
            inode: metadata.ino(),
            kind,
            size: metadata.size(),
            atime: timestamp(metadata.atime(), metadata.atime_nsec()),
            mtime: timestamp(metadata.mtime(), metadata.mtime_nsec()),
            ctime: timestamp(metadata.ctime(), metadata.ctime_nsec()),
            mode: metadata.mode() & 0o7777,
            uid: metadata.uid(),
            gid: metadata.gid(),
            nlinks: metadata.nlink() as u32,
        }
    }

    /// Symlink shape for a non-directory hit: one link, fully open
    /// permission bits, size equal to the target path's byte length.
    pub fn link_to(real_path: &str, metadata: &Metadata) -> Self {
        Self {
            inode: metadata.ino(),
            kind: FileType::Symlink,
            size: real_path.len() as u64,
            atime: timestamp(metadata.atime(), metadata.atime_nsec()),
            mtime: timestamp(metadata.mtime(), metadata.mtime_nsec()),
            ctime: timestamp(metadata.ctime(), metadata.ctime_nsec()),
            mode: 0o777,
            uid: metadata.uid(),
            gid: metadata.gid(),
            nlinks: 1,
        }
    }
}

fn timestamp(secs: i64, nsecs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, nsecs as u32).unwrap_or_default()
}
