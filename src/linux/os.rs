use std::path::Path;

use crate::constants::markers;
use crate::errors::SysprovError;
use crate::utils::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Rhel,
    Debian,
}

impl OsFamily {
    pub fn package_manager(&self) -> &'static str {
        match self {
            Self::Rhel => "yum",
            Self::Debian => "apt",
        }
    }

    pub fn ssh_service(&self) -> &'static str {
        match self {
            Self::Rhel => "sshd",
            Self::Debian => "ssh",
        }
    }

    /// Package providing `program`, if known
    pub fn package_for(&self, program: &str) -> Option<&'static str> {
        let package = match program {
            "pvcreate" | "pvs" | "vgcreate" | "vgextend" | "vgs" | "lvcreate" | "lvextend"
            | "lvs" => "lvm2",
            "mkfs.xfs" | "xfs_growfs" => "xfsprogs",
            "mkfs.ext4" | "resize2fs" => "e2fsprogs",
            "partprobe" => "parted",
            "fdisk" => match self {
                Self::Rhel => "util-linux",
                Self::Debian => "fdisk",
            },
            "lsblk" | "blkid" | "findmnt" | "mount" | "partx" => "util-linux",
            _ => return None,
        };

        Some(package)
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rhel => write!(f, "RHEL"),
            Self::Debian => write!(f, "Debian"),
        }
    }
}

/// Detects the OS family from its release marker files.
/// RHEL wins if both markers are present.
pub fn detect_os(host: &dyn Host) -> Result<OsFamily, SysprovError> {
    if host.exists(Path::new(markers::REDHAT_RELEASE)) {
        return Ok(OsFamily::Rhel);
    }

    if host.exists(Path::new(markers::DEBIAN_VERSION)) {
        return Ok(OsFamily::Debian);
    }

    Err(SysprovError::UnsupportedOs(format!(
        "neither {} nor {} found",
        markers::REDHAT_RELEASE,
        markers::DEBIAN_VERSION,
    )))
}
