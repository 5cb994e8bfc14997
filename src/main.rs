use anyhow::Context;
use clap::Parser;
use signpostfs::config::Config;
use signpostfs::fs::{BackingRoots, OverlayFs};
use signpostfs::fuse::{self, MountOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Read-only overlay that presents every plain file as a symbolic link
/// into the first backing root that contains it.
#[derive(Parser, Debug)]
#[command(name = "signpostfs", version)]
struct Cli {
    /// Backing root directory, searched in the order given; repeatable
    #[arg(short = 'r', long = "root", value_name = "DIR")]
    roots: Vec<String>,

    /// Directory to mount the overlay on
    #[arg(value_name = "MOUNTPOINT")]
    mountpoint: Option<String>,

    /// Allow other users to access the mount
    #[arg(long)]
    allow_other: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signpostfs=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if !cli.roots.is_empty() {
        config.overlay.roots = cli.roots;
    }
    if let Some(mountpoint) = cli.mountpoint {
        config.fuse.mount_point = mountpoint;
    }
    if cli.allow_other {
        config.fuse.allow_other = true;
    }

    let roots = BackingRoots::new(config.overlay.roots.clone())?;
    for root in roots.iter() {
        let metadata = std::fs::metadata(root)
            .with_context(|| format!("Backing root is not accessible: {root}"))?;
        if !metadata.is_dir() {
            anyhow::bail!("Backing root is not a directory: {root}");
        }
    }

    tracing::info!(
        "Starting signpostfs with {} backing root(s), primary {}",
        roots.len(),
        roots.primary()
    );

    let overlay = OverlayFs::new(roots);
    let options = MountOptions { allow_other: config.fuse.allow_other, ..Default::default() };

    fuse::mount(overlay, &config.fuse.mount_point, options)
}
