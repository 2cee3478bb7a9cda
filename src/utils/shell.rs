use std::fs;

use super::host::{
    CmdOutput,
    Host,
};
use crate::errors::{
    CmdError,
    SysprovError,
};

/// Runs a mutating command. Any failure is fatal to the caller.
pub fn run(host: &dyn Host, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError> {
    check(cmd, host.exec(cmd, args, None)?)
}

/// Like [`run`], but feeds `stdin` to the command
pub fn run_with_stdin(
    host: &dyn Host,
    cmd: &str,
    args: &[&str],
    stdin: &str,
) -> Result<CmdOutput, SysprovError> {
    check(cmd, host.exec(cmd, args, Some(stdin))?)
}

/// Runs a read-only command whose failure is fatal to the caller.
/// Unlike [`run`], it still executes under dry-run.
pub fn read(host: &dyn Host, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError> {
    check(cmd, host.query(cmd, args)?)
}

/// Runs a read-only command and returns its stdout.
///
/// A missing program or non-zero exit yields `None`,
/// leaving the caller to decide how to report it.
pub fn capture(host: &dyn Host, cmd: &str, args: &[&str]) -> Option<String> {
    match host.query(cmd, args) {
        Ok(output) if output.success() => Some(output.stdout),
        Ok(output) => {
            tracing::debug!(cmd, ?args, code = ?output.code, "query exited non-zero");
            None
        }
        Err(err) => {
            tracing::warn!(cmd, ?args, "query failed: {err}");
            None
        }
    }
}

fn check(cmd: &str, output: CmdOutput) -> Result<CmdOutput, SysprovError> {
    match output.code {
        Some(0) => Ok(output),
        Some(code) => Err(SysprovError::CmdFailed {
            error: CmdError::ErrExit {
                code,
                stderr: output.stderr,
            },
            context: format!("command {cmd} exited with non-zero status {code}"),
        }),
        None => Err(SysprovError::CmdFailed {
            error: CmdError::ErrSignal,
            context: format!("command {cmd} terminated by signal"),
        }),
    }
}

pub fn in_path(program: &str, path: &str) -> bool {
    for p in path.split(':') {
        if p.is_empty() {
            continue;
        }

        let p_str = format!("{}/{}", p, program);
        if fs::metadata(p_str).is_ok() {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::FakeHost;

    #[test]
    fn test_run_maps_exit_status() {
        let host = FakeHost::new();
        host.respond("pvcreate /dev/sdb", 5, "");
        host.respond_err("vgcreate", "  Volume group \"data_vg\" exists\n");

        match run(&host, "pvcreate", &["/dev/sdb"]) {
            Err(SysprovError::CmdFailed {
                error: CmdError::ErrExit { code, .. },
                ..
            }) => assert_eq!(5, code),
            other => panic!("unexpected result {other:?}"),
        }

        let err = run(&host, "vgcreate", &["data_vg", "/dev/sdc"]).unwrap_err();
        assert!(err.to_string().contains("exists"));

        run(&host, "lvcreate", &["-L", "1G"]).expect("unscripted command should succeed");
    }

    #[test]
    fn test_capture() {
        let host = FakeHost::new();
        host.respond("blkid -s UUID", 0, "abcd\n");
        host.respond("findmnt", 1, "");

        assert_eq!(
            Some("abcd\n".to_string()),
            capture(&host, "blkid", &["-s", "UUID", "-o", "value", "/dev/vg/lv"]),
        );
        assert_eq!(None, capture(&host, "findmnt", &["-n", "/dev/vg/lv"]));
    }

    #[test]
    fn test_in_path() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let program = dir.path().join("pvcreate");
        std::fs::write(&program, "").expect("failed to write dummy program");

        let path = format!("/nonexistent::{}", dir.path().display());
        assert!(in_path("pvcreate", &path));
        assert!(!in_path("vgcreate", &path));
    }
}
