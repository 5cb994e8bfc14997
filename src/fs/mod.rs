pub mod attr;
pub mod error;
pub mod operations;
pub mod path;
pub mod resolver;
pub mod roots;

pub use attr::{FileAttr, FileType};
pub use error::{FsError, FsResult};
pub use operations::{EntryCollector, OverlayFs};
pub use resolver::{Resolution, resolve};
pub use roots::BackingRoots;
