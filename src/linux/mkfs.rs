use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FsType {
    #[serde(rename = "xfs")]
    Xfs,

    #[serde(rename = "ext4")]
    Ext4,
}

impl FromStr for FsType {
    type Err = SysprovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xfs" => Ok(Self::Xfs),
            "ext4" => Ok(Self::Ext4),
            other => Err(SysprovError::BadInput(format!(
                "unsupported filesystem {other}, expecting xfs or ext4"
            ))),
        }
    }
}

impl std::fmt::Display for FsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xfs => write!(f, "xfs"),
            Self::Ext4 => write!(f, "ext4"),
        }
    }
}

/// Executes, overwriting any previous signature:
/// ```shell
/// mkfs.xfs -f ${{ device }}
/// mkfs.ext4 -F ${{ device }}
/// ```
pub fn create_fs(host: &dyn Host, device: &str, fs_type: FsType) -> Result<(), SysprovError> {
    let force = match fs_type {
        FsType::Xfs => "-f",
        FsType::Ext4 => "-F",
    };

    shell::run(host, &format!("mkfs.{fs_type}"), &[force, device])?;

    Ok(())
}

/// Grows a filesystem to fill its device.
///
/// XFS can only grow through its mountpoint, ext4 through the device.
pub fn grow_fs(host: &dyn Host, fs_type: FsType, target: &str) -> Result<(), SysprovError> {
    match fs_type {
        FsType::Xfs => shell::run(host, "xfs_growfs", &[target])?,
        FsType::Ext4 => shell::run(host, "resize2fs", &[target])?,
    };

    Ok(())
}

#[test]
fn test_create_fs() {
    use crate::utils::test_utils::FakeHost;

    let host = FakeHost::new();
    create_fs(&host, "/dev/data_vg/app", FsType::Xfs).unwrap();
    create_fs(&host, "/dev/data_vg/db", "EXT4".parse().unwrap()).unwrap();

    assert_eq!(
        vec!["mkfs.xfs -f /dev/data_vg/app", "mkfs.ext4 -F /dev/data_vg/db"],
        *host.calls.borrow(),
    );

    assert!("btrfs".parse::<FsType>().is_err());
}
