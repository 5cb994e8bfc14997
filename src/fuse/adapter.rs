// FUSE adapter - bridges fuser callbacks to the overlay core
//
// fuser speaks inodes; the overlay core speaks absolute virtual paths.
// The adapter keeps the inode <-> path mapping, converts attribute
// records, streams directory entries into the reply buffer, and refuses
// every write-path operation.

use crate::fs::{EntryCollector, FileAttr, FileType, OverlayFs};
use fuser::{
    FileType as FuseFileType, Filesystem, KernelConfig, ReplyAttr, ReplyCreate, ReplyData,
    ReplyDirectory, ReplyEmpty, ReplyEntry, ReplyOpen, ReplyStatfs, ReplyWrite, Request,
    TimeOrNow,
};
use nix::sys::statvfs::statvfs;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// TTL for attributes and directory entries (1 second)
const ATTR_TTL: Duration = Duration::from_secs(1);

pub struct OverlayAdapter {
    backend: OverlayFs,
    inodes: InodeMap,
}

/// Manages inode <-> path bidirectional mapping
struct InodeMap {
    inode_to_path: HashMap<u64, String>,
    path_to_inode: HashMap<String, u64>,
    next_inode: u64,
}

impl InodeMap {
    fn new() -> Self {
        let mut map = Self {
            inode_to_path: HashMap::new(),
            path_to_inode: HashMap::new(),
            next_inode: 2, // 1 is reserved for root
        };

        map.insert(1, "/".to_string());

        map
    }

    fn insert(&mut self, inode: u64, path: String) {
        self.inode_to_path.insert(inode, path.clone());
        self.path_to_inode.insert(path, inode);
    }

    /// Get or create inode for path
    fn get_or_create(&mut self, path: &str) -> u64 {
        if let Some(&inode) = self.path_to_inode.get(path) {
            return inode;
        }

        let inode = self.next_inode;
        self.next_inode += 1;
        self.insert(inode, path.to_string());
        inode
    }

    fn get_path(&self, inode: u64) -> Option<&str> {
        self.inode_to_path.get(&inode).map(|s| s.as_str())
    }
}

impl OverlayAdapter {
    pub fn new(backend: OverlayFs) -> Self {
        Self { backend, inodes: InodeMap::new() }
    }

    fn path_for(&self, inode: u64) -> Result<String, libc::c_int> {
        self.inodes.get_path(inode).map(|s| s.to_string()).ok_or(libc::ENOENT)
    }

    fn child_path(parent_path: &str, name: &str) -> String {
        if parent_path == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", parent_path, name)
        }
    }

    /// Convert our FileAttr to fuser FileAttr
    fn to_fuse_attr(attr: &FileAttr) -> fuser::FileAttr {
        fuser::FileAttr {
            ino: attr.inode,
            size: attr.size,
            blocks: attr.size.div_ceil(512),
            atime: datetime_to_systemtime(attr.atime),
            mtime: datetime_to_systemtime(attr.mtime),
            ctime: datetime_to_systemtime(attr.ctime),
            crtime: UNIX_EPOCH,
            kind: match attr.kind {
                FileType::RegularFile => FuseFileType::RegularFile,
                FileType::Directory => FuseFileType::Directory,
                FileType::Symlink => FuseFileType::Symlink,
            },
            perm: attr.mode as u16,
            nlink: attr.nlinks,
            uid: attr.uid,
            gid: attr.gid,
            rdev: 0,
            blksize: 4096,
            flags: 0,
        }
    }
}

fn datetime_to_systemtime(dt: chrono::DateTime<chrono::Utc>) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(dt.timestamp().max(0) as u64)
}

/// Streams entry names into the FUSE reply buffer, honoring the requested
/// offset and stopping as soon as the buffer is full. Entry types are
/// reported as regular files; the kernel refines them through lookup.
struct ReplyCollector<'a> {
    reply: &'a mut ReplyDirectory,
    inodes: &'a mut InodeMap,
    dir_path: &'a str,
    index: i64,
    offset: i64,
}

impl EntryCollector for ReplyCollector<'_> {
    fn push(&mut self, name: &str) -> bool {
        self.index += 1;
        if self.index <= self.offset {
            return true;
        }

        let path = OverlayAdapter::child_path(self.dir_path, name);
        let inode = self.inodes.get_or_create(&path);
        !self.reply.add(inode, self.index, FuseFileType::RegularFile, name)
    }
}

impl Filesystem for OverlayAdapter {
    fn init(&mut self, _req: &Request, _config: &mut KernelConfig) -> Result<(), libc::c_int> {
        tracing::info!(
            "Overlay initialized with {} backing root(s), primary {}",
            self.backend.roots().len(),
            self.backend.roots().primary()
        );
        Ok(())
    }

    fn destroy(&mut self) {
        tracing::info!("Overlay destroyed");
    }

    /// Look up a directory entry by name
    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let name = match name.to_str() {
            Some(n) => n,
            None => {
                reply.error(libc::EINVAL);
                return;
            }
        };

        let parent_path = match self.path_for(parent) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        let path = Self::child_path(&parent_path, name);

        match self.backend.get_attr(&path) {
            Ok(mut attr) => {
                attr.inode = self.inodes.get_or_create(&path);
                reply.entry(&ATTR_TTL, &Self::to_fuse_attr(&attr), 0);
            }
            Err(e) => {
                reply.error(e.to_errno());
            }
        }
    }

    /// Get file attributes
    fn getattr(&mut self, _req: &Request, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let path = match self.path_for(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        match self.backend.get_attr(&path) {
            Ok(mut attr) => {
                attr.inode = ino;
                reply.attr(&ATTR_TTL, &Self::to_fuse_attr(&attr));
            }
            Err(e) => {
                reply.error(e.to_errno());
            }
        }
    }

    /// Read the target of a synthesized link
    fn readlink(&mut self, _req: &Request, ino: u64, reply: ReplyData) {
        let path = match self.path_for(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        match self.backend.read_link(&path, libc::PATH_MAX as usize) {
            Ok(target) => reply.data(target.as_bytes()),
            Err(e) => reply.error(e.to_errno()),
        }
    }

    /// Read directory entries
    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let path = match self.path_for(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        if offset < 1 && reply.add(ino, 1, FuseFileType::Directory, ".") {
            reply.ok();
            return;
        }
        if offset < 2 && reply.add(ino, 2, FuseFileType::Directory, "..") {
            reply.ok();
            return;
        }

        let mut collector = ReplyCollector {
            reply: &mut reply,
            inodes: &mut self.inodes,
            dir_path: &path,
            index: 2,
            offset,
        };

        match self.backend.read_dir(&path, &mut collector) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e.to_errno()),
        }
    }

    /// Open a file - discovery only, content is never served through the
    /// overlay. creat(2) is intercepted too, so open never has to handle a
    /// freshly created file.
    fn open(&mut self, _req: &Request, _ino: u64, _flags: i32, reply: ReplyOpen) {
        reply.error(libc::EIO);
    }

    fn read(
        &mut self,
        _req: &Request,
        _ino: u64,
        _fh: u64,
        _offset: i64,
        _size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        reply.error(libc::EIO);
    }

    fn write(
        &mut self,
        _req: &Request,
        _ino: u64,
        _fh: u64,
        _offset: i64,
        _data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        reply.error(libc::EIO);
    }

    fn create(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        reply.error(libc::EIO);
    }

    #[allow(clippy::too_many_arguments)]
    fn setattr(
        &mut self,
        _req: &Request,
        _ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        _size: Option<u64>,
        _atime: Option<TimeOrNow>,
        _mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        reply.error(libc::EIO);
    }

    fn mkdir(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EIO);
    }

    fn unlink(&mut self, _req: &Request, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EIO);
    }

    fn rmdir(&mut self, _req: &Request, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EIO);
    }

    fn rename(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _newparent: u64,
        _newname: &OsStr,
        _flags: u32,
        reply: ReplyEmpty,
    ) {
        reply.error(libc::EIO);
    }

    fn symlink(
        &mut self,
        _req: &Request,
        _parent: u64,
        _link_name: &OsStr,
        _target: &Path,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EIO);
    }

    /// Get filesystem statistics from the primary backing root
    fn statfs(&mut self, _req: &Request, _ino: u64, reply: ReplyStatfs) {
        match statvfs(Path::new(self.backend.roots().primary())) {
            Ok(stat) => reply.statfs(
                stat.blocks() as u64,
                stat.blocks_free() as u64,
                stat.blocks_available() as u64,
                stat.files() as u64,
                stat.files_free() as u64,
                stat.block_size() as u32,
                stat.name_max() as u32,
                stat.fragment_size() as u32,
            ),
            Err(errno) => reply.error(errno as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inode_map_new() {
        let map = InodeMap::new();
        assert_eq!(map.get_path(1), Some("/"));
        assert_eq!(map.next_inode, 2);
    }

    #[test]
    fn test_inode_map_insert() {
        let mut map = InodeMap::new();
        map.insert(2, "/test".to_string());
        assert_eq!(map.get_path(2), Some("/test"));
    }

    #[test]
    fn test_inode_map_get_or_create_is_stable() {
        let mut map = InodeMap::new();
        let ino1 = map.get_or_create("/test");
        let ino2 = map.get_or_create("/test");
        assert_eq!(ino1, ino2);
        assert_eq!(map.get_path(ino1), Some("/test"));
    }

    #[test]
    fn test_inode_map_distinct_paths() {
        let mut map = InodeMap::new();
        let ino1 = map.get_or_create("/one");
        let ino2 = map.get_or_create("/two");
        assert_ne!(ino1, ino2);
    }

    #[test]
    fn test_child_path_under_root() {
        assert_eq!(OverlayAdapter::child_path("/", "x"), "/x");
    }

    #[test]
    fn test_child_path_nested() {
        assert_eq!(OverlayAdapter::child_path("/dir", "x"), "/dir/x");
    }

    #[test]
    fn test_datetime_conversion() {
        let dt = chrono::Utc::now();
        let st = datetime_to_systemtime(dt);
        let secs = st.duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert_eq!(secs as i64, dt.timestamp());
    }

    #[test]
    fn test_datetime_conversion_clamps_pre_epoch() {
        let dt = chrono::DateTime::from_timestamp(-5, 0).unwrap();
        assert_eq!(datetime_to_systemtime(dt), UNIX_EPOCH);
    }
}
