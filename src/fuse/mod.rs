// FUSE interface implementation
//
// This module exposes the overlay core through the kernel's filesystem
// protocol: the adapter translates inode-based callbacks into the core's
// path-based operations, and mount management runs the session.

pub mod adapter;
pub mod mount;

pub use adapter::OverlayAdapter;
pub use mount::{MountOptions, mount};
