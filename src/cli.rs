use clap::{
    Args,
    Parser,
    Subcommand,
    ValueEnum,
};

use crate::errors::SysprovError;

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Interactive LVM provisioning and host bootstrap tool"
)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Option<Commands>,

    /// Dry-run, sysprov will not commit any changes to disks or files,
    /// and will just print steps to be performed
    #[arg(global = true, short = 'n', long = "dry-run", default_value_t = false)]
    pub dry_run: bool,

    /// Log verbosity, repeat for more (-v info, -vv debug).
    /// RUST_LOG takes precedence if set
    #[arg(global = true, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Mount table to record new filesystems in
    #[arg(global = true, long = "fstab", value_parser = validate_filename)]
    pub fstab: Option<String>,

    /// Directory of the monitoring agent plugins
    #[arg(global = true, long = "plugin-dir", value_parser = validate_filename)]
    pub plugin_dir: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive LVM and filesystem manager (default)
    FsManager,

    /// Install the monitoring agent plugins
    DeployPlugins,

    /// Run a monitoring plugin and print its section
    Plugin(ArgsPlugin),

    /// Set up an automation account with SSH key trust and passwordless sudo
    BootstrapSsh(ArgsBootstrapSsh),
}

#[derive(Debug, Args)]
pub struct ArgsPlugin {
    #[arg(value_enum)]
    pub plugin: PluginKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PluginKind {
    LoginCount,
    PasswordExpiry,
}

#[derive(Debug, Args)]
pub struct ArgsBootstrapSsh {
    /// Automation account name
    #[arg(short = 'u', long = "user", default_value_t = String::from(crate::constants::defaults::AUTOMATION_USER))]
    pub user: String,

    /// Public key to trust, e.g. "ssh-ed25519 AAAA... ops@example".
    /// Prompted for if omitted
    #[arg(short = 'k', long = "pubkey")]
    pub pubkey: Option<String>,
}

fn validate_filename(name: &str) -> Result<String, SysprovError> {
    if name.is_empty() {
        return Err(SysprovError::BadArgs(String::from("empty filename")));
    }

    Ok(name.to_string())
}
