use thiserror::Error;

use crate::entity::action::Action;

#[derive(Debug, Error)]
pub enum SysprovError {
    #[error("file error: {1}: {0}")]
    FileError(std::io::Error, String),

    #[error("command failed: {context}: {error}")]
    CmdFailed { error: CmdError, context: String },

    #[error("bad cli arguments: {0}")]
    BadArgs(String),

    #[error("bad input: {0}")]
    BadInput(String),

    #[error("input closed")]
    InputClosed,

    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("step failed: {error}")]
    StepFailed {
        error: Box<SysprovError>,
        action_failed: Box<Action>,
        actions_performed: Vec<Action>,
    },
}

#[derive(Debug)]
pub enum CmdError {
    ErrSpawn { error: std::io::Error },
    ErrExit { code: i32, stderr: String },
    ErrSignal,
}

impl std::fmt::Display for CmdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ErrSpawn { error } => write!(f, "spawn error: {error}"),
            Self::ErrExit { code, stderr } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    return write!(f, "exit status {code}");
                }

                write!(f, "exit status {code}: {stderr}")
            }
            Self::ErrSignal => write!(f, "terminated by signal"),
        }
    }
}
