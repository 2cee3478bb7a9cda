use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::constants::defaults;

/// Where things live on the managed host
#[derive(Debug, Clone)]
pub struct Config {
    pub dry_run: bool,
    pub fstab: PathBuf,
    pub passwd: PathBuf,
    pub sshd_config: PathBuf,
    pub sudoers_dir: PathBuf,
    pub plugin_dir: PathBuf,
    pub settle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            fstab: PathBuf::from(defaults::FSTAB),
            passwd: PathBuf::from(defaults::PASSWD),
            sshd_config: PathBuf::from(defaults::SSHD_CONFIG),
            sudoers_dir: PathBuf::from(defaults::SUDOERS_DIR),
            plugin_dir: PathBuf::from(defaults::PLUGIN_DIR),
            settle: Duration::from_secs(defaults::SETTLE_SECS),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self {
            dry_run: cli.dry_run,
            ..Default::default()
        };

        if let Some(ref fstab) = cli.fstab {
            config.fstab = PathBuf::from(fstab);
        }

        if let Some(ref plugin_dir) = cli.plugin_dir {
            config.plugin_dir = PathBuf::from(plugin_dir);
        }

        config
    }
}
