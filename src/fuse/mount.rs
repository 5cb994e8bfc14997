// FUSE mount management
//
// Translates mount options and runs the blocking mount session.

use super::OverlayAdapter;
use crate::fs::OverlayFs;
use anyhow::{Context, Result};
use std::path::Path;

/// Mount options for the overlay
#[derive(Debug, Clone)]
pub struct MountOptions {
    /// Allow other users to access the filesystem
    pub allow_other: bool,

    /// Allow root to access the filesystem
    pub allow_root: bool,

    /// Filesystem name (for mtab)
    pub fsname: Option<String>,

    /// Auto-unmount on process exit
    pub auto_unmount: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            allow_other: false,
            allow_root: false,
            fsname: Some("signpostfs".to_string()),
            auto_unmount: true,
        }
    }
}

impl MountOptions {
    /// Convert to fuser mount options. Every mount is read-only; the
    /// overlay has no write path.
    fn to_fuser_options(&self) -> Vec<fuser::MountOption> {
        let mut options = vec![fuser::MountOption::RO];

        if self.allow_other {
            options.push(fuser::MountOption::AllowOther);
        }

        if self.allow_root {
            options.push(fuser::MountOption::AllowRoot);
        }

        if let Some(ref fsname) = self.fsname {
            options.push(fuser::MountOption::FSName(fsname.clone()));
        }

        if self.auto_unmount {
            options.push(fuser::MountOption::AutoUnmount);
        }

        options
    }
}

/// Mount the overlay at `mountpoint` and serve requests until the
/// filesystem is unmounted.
pub fn mount(overlay: OverlayFs, mountpoint: impl AsRef<Path>, options: MountOptions) -> Result<()> {
    let mountpoint = mountpoint.as_ref();

    if !mountpoint.exists() {
        anyhow::bail!("Mount point does not exist: {}", mountpoint.display());
    }

    if !mountpoint.is_dir() {
        anyhow::bail!("Mount point is not a directory: {}", mountpoint.display());
    }

    let adapter = OverlayAdapter::new(overlay);
    let fuser_options = options.to_fuser_options();

    tracing::info!("Mounting signpostfs at {}", mountpoint.display());

    fuser::mount2(adapter, mountpoint, &fuser_options).context("Failed to mount filesystem")?;

    tracing::info!("Filesystem unmounted");

    Ok(())
}
