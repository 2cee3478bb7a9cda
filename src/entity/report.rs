use serde_json::json;

use super::action::Action;

#[derive(Debug)]
pub struct Report {
    pub step: &'static str,
    pub actions: Vec<Action>,
    pub duration: std::time::Duration,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "step": self.step,
            "actions": self.actions,
            "elapsedTime": self.duration,
        })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json_string())
    }
}

#[test]
fn test_report_json() {
    use crate::linux::mkfs::FsType;

    let report = Report {
        step: "create-lvs",
        actions: vec![
            Action::CreateLv {
                vg: "data_vg".into(),
                lv: "app".into(),
                size: "50G".into(),
            },
            Action::CreateFs {
                device: "/dev/data_vg/app".into(),
                fs_type: FsType::Xfs,
            },
        ],
        duration: std::time::Duration::from_secs(3),
    };

    let json = report.to_json();
    assert_eq!("create-lvs", json["step"]);
    assert_eq!("app", json["actions"][0]["createLvmLv"]["lv"]);
    assert_eq!("xfs", json["actions"][1]["createFilesystem"]["fs_type"]);
}
