/// A virtual path is usable iff it is non-empty, absolute, and free of
/// NUL bytes. Ill-formed paths never reach a backing root.
pub fn is_wellformed(path: &str) -> bool {
    !path.is_empty() && path.starts_with('/') && !path.contains('\0')
}

/// Join a backing root with a virtual path. The root carries no trailing
/// separator and the virtual path starts with one, so concatenation is
/// exact.
pub fn join_real(root: &str, virtual_path: &str) -> String {
    let mut real = String::with_capacity(root.len() + virtual_path.len());
    real.push_str(root);
    real.push_str(virtual_path);
    real
}
