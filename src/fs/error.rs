use thiserror::Error;

pub type FsResult<T> = Result<T, FsError>;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a symbolic link: {0}")]
    NotALink(String),

    #[error("Not a directory: {0}")]
    NotDirectory(String),

    #[error("Link target needs {needed} bytes, buffer holds {capacity}")]
    InsufficientCapacity { needed: usize, capacity: usize },

    #[error("Out of resources: {0}")]
    ResourceExhausted(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl FsError {
    /// Convert to POSIX errno
    pub fn to_errno(&self) -> i32 {
        match self {
            FsError::NotFound(_) => libc::ENOENT,
            FsError::NotALink(_) => libc::EINVAL,
            FsError::NotDirectory(_) => libc::ENOTDIR,
            FsError::InsufficientCapacity { .. } => libc::ENOMEM,
            FsError::ResourceExhausted(_) => libc::ENOMEM,
            FsError::PermissionDenied(_) => libc::EACCES,
            FsError::InvalidArgument(_) => libc::EINVAL,
            FsError::IoError(_) => libc::EIO,
        }
    }

    /// Classify a platform errno reported for `path`
    pub fn from_errno(errno: i32, path: &str) -> Self {
        match errno {
            libc::ENOENT => FsError::NotFound(path.to_string()),
            libc::ENOTDIR => FsError::NotDirectory(path.to_string()),
            libc::EACCES => FsError::PermissionDenied(path.to_string()),
            libc::ENOMEM | libc::EMFILE | libc::ENFILE => {
                FsError::ResourceExhausted(path.to_string())
            }
            libc::EINVAL => FsError::InvalidArgument(path.to_string()),
            _ => FsError::IoError(format!("{path} (errno {errno})")),
        }
    }

    pub fn from_io(err: &std::io::Error, path: &str) -> Self {
        match err.raw_os_error() {
            Some(errno) => FsError::from_errno(errno, path),
            None => FsError::IoError(format!("{path}: {err}")),
        }
    }
}
