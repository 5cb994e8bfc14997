// signpostfs - read-only overlay that presents every plain file as a
// symbolic link into the first backing root that contains it.

pub mod config;
pub mod fs;
pub mod fuse;
