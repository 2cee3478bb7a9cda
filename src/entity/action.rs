use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::SysprovError;
use crate::linux::mkfs::FsType;

/// An external change made (or about to be made) on the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "createPartition")]
    CreatePartition {
        device: String,
        size: String,
        lvm: bool,
    },

    #[serde(rename = "rereadPartitionTable")]
    RereadPartitionTable { device: String },

    #[serde(rename = "createLvmPv")]
    CreatePv(String),

    #[serde(rename = "reuseLvmPv")]
    ReusePv(String),

    #[serde(rename = "createLvmVg")]
    CreateVg { vg: String, pvs: Vec<String> },

    #[serde(rename = "extendLvmVg")]
    ExtendVg { vg: String, pv: String },

    #[serde(rename = "createLvmLv")]
    CreateLv { vg: String, lv: String, size: String },

    #[serde(rename = "extendLvmLv")]
    ExtendLv { device: String, size: String },

    #[serde(rename = "createFilesystem")]
    CreateFs { device: String, fs_type: FsType },

    #[serde(rename = "growFilesystem")]
    GrowFs { device: String, fs_type: FsType },

    #[serde(rename = "mkdirMountpoint")]
    Mkdir(String),

    #[serde(rename = "mountFilesystem")]
    MountFs { src: String, dst: String },

    #[serde(rename = "appendFstab")]
    AppendFstab(String),

    #[serde(rename = "createUser")]
    CreateUser(String),

    #[serde(rename = "prepareSshDir")]
    PrepareSshDir(String),

    #[serde(rename = "authorizeKey")]
    AuthorizeKey { user: String },

    #[serde(rename = "writeSudoers")]
    WriteSudoers(String),

    #[serde(rename = "configureSshd")]
    ConfigureSshd(String),

    #[serde(rename = "restartService")]
    RestartService(String),

    #[serde(rename = "deployPlugin")]
    DeployPlugin(String),
}

/// Actions performed so far by one workflow step.
///
/// A failure is wrapped into [`SysprovError::StepFailed`] together with
/// everything done before it, so the operator knows what to clean up.
#[derive(Debug, Default)]
pub struct Progress {
    actions: Vec<Action>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<T>(
        &mut self,
        action: Action,
        result: Result<T, SysprovError>,
    ) -> Result<T, SysprovError> {
        match result {
            Ok(value) => {
                self.actions.push(action);
                Ok(value)
            }
            Err(err) => Err(SysprovError::StepFailed {
                error: Box::new(err),
                action_failed: Box::new(action),
                actions_performed: std::mem::take(&mut self.actions),
            }),
        }
    }

    /// Like [`Progress::record`] for steps that may find nothing to do:
    /// `action` is only recorded if `result` is `Ok(true)`.
    pub fn record_changed(
        &mut self,
        action: Action,
        result: Result<bool, SysprovError>,
    ) -> Result<bool, SysprovError> {
        match result {
            Ok(false) => Ok(false),
            result => self.record(action, result),
        }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}
