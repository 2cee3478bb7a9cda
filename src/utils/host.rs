use std::fs;
use std::io::Write;
use std::os::unix::fs::{
    FileTypeExt,
    PermissionsExt,
};
use std::path::Path;
use std::process::{
    Command,
    Stdio,
};
use std::time::Duration;

use colored::Colorize;

use crate::errors::{
    CmdError,
    SysprovError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmdOutput {
    /// `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::Output> for CmdOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Everything the workflows need from the machine they run on.
///
/// Mutating operations (`exec`, writes, ownership changes) are kept apart
/// from read-only ones (`query`, reads) so that [`DryRun`] can
/// print the former while still inspecting the system.
pub trait Host {
    /// Runs a command that changes system state.
    /// Only spawn failures are errors; exit status is left to the caller.
    fn exec(&self, cmd: &str, args: &[&str], stdin: Option<&str>) -> Result<CmdOutput, SysprovError>;

    /// Runs a command that only inspects system state
    fn query(&self, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError>;

    fn exists(&self, path: &Path) -> bool;

    fn is_block_device(&self, path: &Path) -> bool;

    fn in_path(&self, program: &str) -> bool;

    /// Returns `Ok(None)` if `path` does not exist
    fn read_to_string(&self, path: &Path) -> Result<Option<String>, SysprovError>;

    fn create_dir_all(&self, path: &Path) -> Result<(), SysprovError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), SysprovError>;

    fn append(&self, path: &Path, content: &str) -> Result<(), SysprovError>;

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), SysprovError>;

    fn chown(&self, path: &Path, user: &str) -> Result<(), SysprovError>;

    /// Blocks while the kernel settles, e.g. after a partition table change
    fn settle(&self, duration: Duration);
}

pub struct LinuxHost;

impl LinuxHost {
    fn command(cmd: &str, args: &[&str], stdin: Option<&str>) -> Result<CmdOutput, SysprovError> {
        tracing::debug!(cmd, ?args, stdin = stdin.is_some(), "running command");

        let mut child = Command::new(cmd)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(match stdin {
                Some(_) => Stdio::piped(),
                None => Stdio::null(),
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| SysprovError::CmdFailed {
                error: CmdError::ErrSpawn { error },
                context: format!("command {cmd} failed to spawn"),
            })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())
                .map_err(|error| SysprovError::CmdFailed {
                    error: CmdError::ErrSpawn { error },
                    context: format!("command {cmd} failed to read stdin"),
                })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|error| SysprovError::CmdFailed {
                error: CmdError::ErrSpawn { error },
                context: format!("command {cmd} failed to run"),
            })?;

        let output = CmdOutput::from(output);
        tracing::debug!(cmd, code = ?output.code, "command finished");

        Ok(output)
    }
}

impl Host for LinuxHost {
    fn exec(&self, cmd: &str, args: &[&str], stdin: Option<&str>) -> Result<CmdOutput, SysprovError> {
        Self::command(cmd, args, stdin)
    }

    fn query(&self, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError> {
        Self::command(cmd, args, None)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_block_device(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.file_type().is_block_device())
            .unwrap_or(false)
    }

    fn in_path(&self, program: &str) -> bool {
        let path = std::env::var("PATH").unwrap_or_default();
        super::shell::in_path(program, &path)
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>, SysprovError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SysprovError::FileError(
                err,
                format!("failed to read {}", path.display()),
            )),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SysprovError> {
        fs::create_dir_all(path).map_err(|err| {
            SysprovError::FileError(err, format!("failed to create directory {}", path.display()))
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        fs::write(path, content)
            .map_err(|err| SysprovError::FileError(err, format!("failed to write {}", path.display())))
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| SysprovError::FileError(err, format!("failed to open {}", path.display())))?;

        file.write_all(content.as_bytes())
            .map_err(|err| SysprovError::FileError(err, format!("failed to append to {}", path.display())))
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), SysprovError> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|err| {
            SysprovError::FileError(err, format!("failed to chmod {mode:o} {}", path.display()))
        })
    }

    fn chown(&self, path: &Path, user: &str) -> Result<(), SysprovError> {
        let user = crate::linux::user::lookup(user)?;

        nix::unistd::chown(path, Some(user.uid), Some(user.gid)).map_err(|errno| {
            SysprovError::FileError(
                std::io::Error::from(errno),
                format!("failed to chown {} to {}", path.display(), user.name),
            )
        })
    }

    fn settle(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Prints mutating operations instead of performing them.
/// Read-only operations go to the wrapped host.
pub struct DryRun<H: Host>(pub H);

impl<H: Host> DryRun<H> {
    fn print(&self, what: String) {
        println!("{} {what}", "[dry-run]".cyan());
    }
}

impl<H: Host> Host for DryRun<H> {
    fn exec(&self, cmd: &str, args: &[&str], stdin: Option<&str>) -> Result<CmdOutput, SysprovError> {
        match stdin {
            Some(input) => self.print(format!("{cmd} {} <<< {input:?}", args.join(" "))),
            None => self.print(format!("{cmd} {}", args.join(" "))),
        }

        Ok(CmdOutput {
            code: Some(0),
            ..Default::default()
        })
    }

    fn query(&self, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError> {
        self.0.query(cmd, args)
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.exists(path)
    }

    fn is_block_device(&self, path: &Path) -> bool {
        self.0.is_block_device(path)
    }

    fn in_path(&self, program: &str) -> bool {
        self.0.in_path(program)
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>, SysprovError> {
        self.0.read_to_string(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SysprovError> {
        self.print(format!("mkdir -p {}", path.display()));
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        self.print(format!("write {} <<< {content:?}", path.display()));
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        self.print(format!("append {} <<< {content:?}", path.display()));
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), SysprovError> {
        self.print(format!("chmod {mode:o} {}", path.display()));
        Ok(())
    }

    fn chown(&self, path: &Path, user: &str) -> Result<(), SysprovError> {
        self.print(format!("chown {user}: {}", path.display()));
        Ok(())
    }

    fn settle(&self, _duration: Duration) {}
}
