mod sshd_config;

use std::path::{
    Path,
    PathBuf,
};

use colored::Colorize;

use crate::config::Config;
use crate::constants::SSHD_AUTHORIZED_KEYS_FILE;
use crate::entity::action::{
    Action,
    Progress,
};
use crate::errors::SysprovError;
use crate::linux::{
    os,
    service,
    user,
};
use crate::prompt::{
    self,
    Input,
};
use crate::utils::host::Host;
use crate::utils::shell;

const KEY_TYPES: [&str; 8] = [
    "ssh-ed25519",
    "ssh-rsa",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "sk-ssh-ed25519@openssh.com",
    "sk-ecdsa-sha2-nistp256@openssh.com",
    "ssh-dss",
];

/// Gives `username` key-based SSH access and passwordless sudo.
///
/// Every step checks the current state first, so running it again
/// with the same key changes nothing but the service restart.
pub fn bootstrap(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
    username: &str,
    pubkey: Option<&str>,
) -> Result<Vec<Action>, SysprovError> {
    let family = os::detect_os(host)?;

    let pubkey = match pubkey {
        Some(key) => validate_pubkey(key).map_err(SysprovError::BadArgs)?,
        None => prompt::ask_valid(input, &format!("Public key for {username}"), "", validate_pubkey)?,
    };

    let mut progress = Progress::new();

    if !user::exists(host, username) {
        progress.record(
            Action::CreateUser(username.to_string()),
            user::create(host, username),
        )?;
        println!("{}", format!("Created user {username}").green());
    }

    let home = PathBuf::from(user::home_dir(host, username));
    let ssh_dir = home.join(".ssh");
    progress.record(
        Action::PrepareSshDir(ssh_dir.display().to_string()),
        prepare_ssh_dir(host, &ssh_dir, username),
    )?;

    let authorized_keys = home.join(SSHD_AUTHORIZED_KEYS_FILE);
    let added = progress.record_changed(
        Action::AuthorizeKey {
            user: username.to_string(),
        },
        authorize_key(host, &authorized_keys, username, &pubkey),
    )?;

    if !added {
        println!("Key already authorized for {username}");
    }

    let sudoers = config.sudoers_dir.join(username);
    let written = progress.record_changed(
        Action::WriteSudoers(sudoers.display().to_string()),
        write_sudoers(host, &sudoers, username),
    )?;

    if !written {
        println!("{} already in place", sudoers.display());
    }

    let changed = progress.record_changed(
        Action::ConfigureSshd(config.sshd_config.display().to_string()),
        configure_sshd(host, &config.sshd_config),
    )?;

    if !changed {
        println!("{} already configured", config.sshd_config.display());
    }

    let ssh_service = family.ssh_service();
    progress.record(
        Action::RestartService(ssh_service.to_string()),
        service::restart(host, ssh_service),
    )?;

    println!("{}", format!("SSH trust for {username} is in place").green());

    Ok(progress.into_actions())
}

fn validate_pubkey(key: &str) -> Result<String, String> {
    let key = key.trim();
    if key.contains('\n') {
        return Err("key must be a single line".to_string());
    }

    let mut fields = key.split_whitespace();
    let key_type = fields.next().ok_or("empty key")?;
    if !KEY_TYPES.contains(&key_type) {
        return Err(format!("unknown key type {key_type}"));
    }

    match fields.next() {
        Some(blob) if blob.starts_with("AAAA") => Ok(key.to_string()),
        Some(_) => Err("key data is not base64 encoded".to_string()),
        None => Err("missing key data".to_string()),
    }
}

fn prepare_ssh_dir(host: &dyn Host, ssh_dir: &Path, username: &str) -> Result<(), SysprovError> {
    host.create_dir_all(ssh_dir)?;
    host.set_mode(ssh_dir, 0o700)?;
    host.chown(ssh_dir, username)
}

/// Appends `pubkey` unless the same key (type and data) is already there
fn authorize_key(
    host: &dyn Host,
    path: &Path,
    username: &str,
    pubkey: &str,
) -> Result<bool, SysprovError> {
    let existing = host.read_to_string(path)?.unwrap_or_default();
    let added = !contains_key(&existing, pubkey);

    if added {
        let mut line = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            line.push('\n');
        }
        line.push_str(pubkey);
        line.push('\n');

        host.append(path, &line)?;
    }

    host.set_mode(path, 0o600)?;
    host.chown(path, username)?;

    Ok(added)
}

// Compares key type and data, ignoring comments and options
fn contains_key(authorized_keys: &str, pubkey: &str) -> bool {
    let wanted: Vec<&str> = pubkey.split_whitespace().take(2).collect();

    authorized_keys
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .any(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            fields.windows(2).any(|pair| pair == wanted.as_slice())
        })
}

/// Returns whether the drop-in was (re)written
fn write_sudoers(host: &dyn Host, path: &Path, username: &str) -> Result<bool, SysprovError> {
    let policy = format!("{username} ALL=(ALL) NOPASSWD:ALL\n");

    if host.read_to_string(path)?.as_deref() == Some(policy.as_str()) {
        return Ok(false);
    }

    if host.in_path("visudo") {
        shell::run_with_stdin(host, "visudo", &["-c", "-f", "-"], &policy)?;
    } else {
        tracing::warn!("visudo not found, writing {} unchecked", path.display());
    }

    host.write(path, &policy)?;
    host.set_mode(path, 0o440)?;

    Ok(true)
}

fn configure_sshd(host: &dyn Host, path: &Path) -> Result<bool, SysprovError> {
    let original = host.read_to_string(path)?.ok_or_else(|| {
        SysprovError::FileError(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            format!("no sshd config at {}", path.display()),
        )
    })?;

    let directives = [
        ("PubkeyAuthentication", "yes"),
        ("AuthorizedKeysFile", SSHD_AUTHORIZED_KEYS_FILE),
    ];

    let mut content = original.clone();
    for (key, value) in directives {
        if let Some(updated) = sshd_config::ensure_directive(&content, key, value) {
            content = updated;
        }
    }

    if content == original {
        return Ok(false);
    }

    host.write(path, &content)?;

    Ok(true)
}
