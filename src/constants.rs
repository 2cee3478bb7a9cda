pub mod defaults {
    pub const FSTAB: &str = "/etc/fstab";
    pub const PASSWD: &str = "/etc/passwd";
    pub const SSHD_CONFIG: &str = "/etc/ssh/sshd_config";
    pub const SUDOERS_DIR: &str = "/etc/sudoers.d";
    pub const PLUGIN_DIR: &str = "/usr/lib/check_mk_agent/plugins";

    pub const FS_TYPE: &str = "xfs";
    pub const AUTOMATION_USER: &str = "automation";
    pub const LOGIN_SHELL: &str = "/bin/bash";

    /// Seconds to wait for device nodes after re-reading a partition table
    pub const SETTLE_SECS: u64 = 2;
}

pub mod markers {
    pub const REDHAT_RELEASE: &str = "/etc/redhat-release";
    pub const DEBIAN_VERSION: &str = "/etc/debian_version";
}

// Use programs instead of bindings to avoid API dependencies
pub const REQUIRED_COMMANDS: [&str; 15] = [
    "fdisk",
    "partprobe",
    "lsblk",
    "blkid",
    "findmnt",
    "pvcreate",
    "pvs",
    "vgcreate",
    "vgextend",
    "vgs",
    "lvcreate",
    "lvextend",
    "mkfs.xfs",
    "mkfs.ext4",
    "mount",
];

/// Optional grow tools, checked alongside [`REQUIRED_COMMANDS`]
pub const GROW_COMMANDS: [&str; 2] = ["xfs_growfs", "resize2fs"];

pub const LVM_PART_TYPE_DOS: &str = "8e";
pub const LVM_PART_TYPE_GPT: &str = "lvm";

pub const SECTION_LOGIN_COUNT: &str = "<<<login_count>>>";
pub const SECTION_PASSWORD_EXPIRY: &str = "<<<password_expiry>>>";

pub const PLUGIN_LOGIN_COUNT: &str = "login_count";
pub const PLUGIN_PASSWORD_EXPIRY: &str = "password_expiry";

/// Lowest UID given to human accounts
pub const UID_MIN: u32 = 1000;
pub const UID_NOBODY: u32 = 65534;

pub const EXPIRY_WARN_DAYS: i64 = 3;
pub const EXPIRY_CRIT_DAYS: i64 = 1;

pub const SSHD_AUTHORIZED_KEYS_FILE: &str = ".ssh/authorized_keys";
