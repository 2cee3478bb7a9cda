use nix::unistd::{
    Uid,
    User,
};

use crate::constants::defaults;
use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

/// Returns whether the current user is privileged
pub fn is_root() -> bool {
    Uid::effective().is_root()
}

pub fn lookup(name: &str) -> Result<User, SysprovError> {
    match User::from_name(name) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(SysprovError::BadInput(format!("no such user {name}"))),
        Err(errno) => Err(SysprovError::FileError(
            std::io::Error::from(errno),
            format!("failed to look up user {name}"),
        )),
    }
}

pub fn exists(host: &dyn Host, name: &str) -> bool {
    shell::capture(host, "id", &["-u", name]).is_some()
}

/// Executes:
/// ```shell
/// useradd -m -s /bin/bash ${{ name }}
/// ```
pub fn create(host: &dyn Host, name: &str) -> Result<(), SysprovError> {
    shell::run(host, "useradd", &["-m", "-s", defaults::LOGIN_SHELL, name])?;

    Ok(())
}

/// Home directory from the passwd database, `/home/<name>` if unknown
pub fn home_dir(host: &dyn Host, name: &str) -> String {
    shell::capture(host, "getent", &["passwd", name])
        .and_then(|line| {
            line.lines()
                .next()
                .and_then(|entry| entry.split(':').nth(5))
                .filter(|home| !home.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("/home/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::FakeHost;

    #[test]
    fn test_home_dir() {
        let host = FakeHost::new();
        host.respond(
            "getent passwd automation",
            0,
            "automation:x:1001:1001::/srv/automation:/bin/bash\n",
        );
        host.respond("getent passwd ghost", 2, "");

        assert_eq!("/srv/automation", home_dir(&host, "automation"));
        assert_eq!("/home/ghost", home_dir(&host, "ghost"));
    }

    #[test]
    fn test_exists() {
        let host = FakeHost::new();
        host.respond("id -u ghost", 1, "");

        assert!(exists(&host, "root"));
        assert!(!exists(&host, "ghost"));
    }
}
