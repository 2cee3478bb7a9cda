use std::cell::RefCell;
use std::collections::{
    HashMap,
    HashSet,
    VecDeque,
};
use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use super::host::{
    CmdOutput,
    Host,
};
use crate::errors::SysprovError;

/// In-memory host recording every command it is asked to run.
///
/// Command responses are matched by prefix against `"cmd arg1 arg2"`.
/// One-shot responses are consumed in order before persistent ones
/// are considered; unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeHost {
    pub calls: RefCell<Vec<String>>,
    pub stdins: RefCell<Vec<(String, String)>>,
    pub files: RefCell<HashMap<PathBuf, String>>,
    pub modes: RefCell<HashMap<PathBuf, u32>>,
    pub owners: RefCell<HashMap<PathBuf, String>>,
    pub dirs: RefCell<HashSet<PathBuf>>,
    pub block_devices: RefCell<HashSet<PathBuf>>,
    pub missing_programs: RefCell<HashSet<String>>,
    pub settled: RefCell<Vec<Duration>>,
    once: RefCell<VecDeque<(String, CmdOutput)>>,
    always: RefCell<Vec<(String, CmdOutput)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prefix: &str, code: i32, stdout: &str) {
        self.always
            .borrow_mut()
            .push((prefix.to_string(), output(code, stdout, "")));
    }

    pub fn respond_err(&self, prefix: &str, stderr: &str) {
        self.always
            .borrow_mut()
            .push((prefix.to_string(), output(1, "", stderr)));
    }

    pub fn respond_once(&self, prefix: &str, code: i32, stdout: &str) {
        self.once
            .borrow_mut()
            .push_back((prefix.to_string(), output(code, stdout, "")));
    }

    pub fn add_block_device(&self, path: &str) {
        self.block_devices.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(PathBuf::from(path), content.to_string());
    }

    pub fn add_dir(&self, path: &str) {
        self.dirs.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn set_missing(&self, program: &str) {
        self.missing_programs.borrow_mut().insert(program.to_string());
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|call| call.starts_with(prefix))
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn answer(&self, cmd: &str, args: &[&str]) -> CmdOutput {
        let line = std::iter::once(cmd)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        self.calls.borrow_mut().push(line.clone());

        let mut once = self.once.borrow_mut();
        if let Some(i) = once.iter().position(|(prefix, _)| line.starts_with(prefix)) {
            if let Some((_, output)) = once.remove(i) {
                return output;
            }
        }

        self.always
            .borrow()
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| output(0, "", ""))
    }
}

fn output(code: i32, stdout: &str, stderr: &str) -> CmdOutput {
    CmdOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

impl Host for FakeHost {
    fn exec(&self, cmd: &str, args: &[&str], stdin: Option<&str>) -> Result<CmdOutput, SysprovError> {
        if let Some(input) = stdin {
            self.stdins
                .borrow_mut()
                .push((cmd.to_string(), input.to_string()));
        }

        Ok(self.answer(cmd, args))
    }

    fn query(&self, cmd: &str, args: &[&str]) -> Result<CmdOutput, SysprovError> {
        Ok(self.answer(cmd, args))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
            || self.dirs.borrow().contains(path)
            || self.block_devices.borrow().contains(path)
    }

    fn is_block_device(&self, path: &Path) -> bool {
        self.block_devices.borrow().contains(path)
    }

    fn in_path(&self, program: &str) -> bool {
        !self.missing_programs.borrow().contains(program)
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>, SysprovError> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SysprovError> {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }

        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());

        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), SysprovError> {
        self.files
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);

        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), SysprovError> {
        self.modes.borrow_mut().insert(path.to_path_buf(), mode);
        Ok(())
    }

    fn chown(&self, path: &Path, user: &str) -> Result<(), SysprovError> {
        self.owners
            .borrow_mut()
            .insert(path.to_path_buf(), user.to_string());

        Ok(())
    }

    fn settle(&self, duration: Duration) {
        self.settled.borrow_mut().push(duration);
    }
}
