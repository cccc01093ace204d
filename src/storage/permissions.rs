//! File permissions
//!
//! Captures, reapplies, and formats access-mode bits. Mode handling is
//! meaningful on unix; elsewhere the helpers report unknown and
//! reapplication is a no-op.

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Mode applied to files that did not exist before an upload.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

#[cfg(unix)]
pub fn mode_bits(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
pub fn mode_bits(_metadata: &Metadata) -> Option<u32> {
    None
}

/// Format mode bits the way listings report them, e.g. `644`.
pub fn mode_string(mode: u32) -> String {
    format!("{:o}", mode & 0o777)
}

#[cfg(unix)]
pub async fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
pub async fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_string_masks_to_permission_bits() {
        assert_eq!(mode_string(0o100644), "644");
        assert_eq!(mode_string(0o755), "755");
        assert_eq!(mode_string(0o600), "600");
    }
}
