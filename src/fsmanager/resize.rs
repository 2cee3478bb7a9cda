use std::path::Path;

use colored::Colorize;

use super::Outcome;
use crate::entity::action::{
    Action,
    Progress,
};
use crate::entity::SizeToken;
use crate::errors::SysprovError;
use crate::linux::mkfs::{
    self,
    FsType,
};
use crate::linux::{
    blkid,
    lvm,
    mount,
};
use crate::prompt::{
    self,
    Input,
};
use crate::utils::host::Host;

/// Extends a logical volume and grows its filesystem online
pub fn extend_lv(host: &dyn Host, input: &mut dyn Input) -> Result<Outcome, SysprovError> {
    let vg = prompt::ask_required(input, "Volume group")?;
    let lv = prompt::ask_required(input, "Logical volume")?;

    let device = lvm::lv_path(&vg, &lv);
    if !host.exists(Path::new(&device)) {
        return Ok(Outcome::Aborted(format!("logical volume {device} not found")));
    }

    let size = prompt::ask_valid(input, "Size to add (e.g. +10G, +100%FREE)", "", |s| {
        SizeToken::parse(s)
            .map(SizeToken::into_relative)
            .map_err(|err| err.to_string())
    })?;

    let mut progress = Progress::new();
    progress.record(
        Action::ExtendLv {
            device: device.clone(),
            size: size.to_string(),
        },
        lvm::extend_lv(host, &device, &size),
    )?;

    println!("{}", format!("Extended {device} by {size}").green());

    let detected = blkid::probe(host, &device).dev_type;
    let fs_type = match detected.as_deref().map(str::parse::<FsType>) {
        Some(Ok(fs_type)) => fs_type,
        _ => {
            let detected = detected.unwrap_or_else(|| "none".to_string());
            println!(
                "{}",
                format!("Filesystem on {device} is {detected}, skipping filesystem grow").yellow()
            );
            return Ok(Outcome::Done(progress.into_actions()));
        }
    };

    let target = match fs_type {
        FsType::Ext4 => device.clone(),
        FsType::Xfs => match mount::find_mountpoint(host, &device) {
            Some(mountpoint) => mountpoint,
            None => {
                eprintln!(
                    "{}",
                    format!("WARN: xfs on {device} is not mounted, mount it and run xfs_growfs")
                        .yellow()
                );
                return Ok(Outcome::Done(progress.into_actions()));
            }
        },
    };

    progress.record(
        Action::GrowFs {
            device: device.clone(),
            fs_type,
        },
        mkfs::grow_fs(host, fs_type, &target),
    )?;

    println!("{}", format!("Grew {fs_type} filesystem on {device}").green());

    Ok(Outcome::Done(progress.into_actions()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Scripted;
    use crate::utils::test_utils::FakeHost;

    fn host(fs_type: &str) -> FakeHost {
        let host = FakeHost::new();
        host.add_block_device("/dev/data_vg/app");
        host.respond(
            "blkid -p /dev/data_vg/app",
            0,
            &format!("/dev/data_vg/app: UUID=\"6f1c\" TYPE=\"{fs_type}\"\n"),
        );
        host
    }

    #[test]
    fn test_unmounted_xfs_skips_grow() {
        let host = host("xfs");
        host.respond("findmnt", 1, "");

        let mut input = Scripted::new(&["data_vg", "app", "10G"]);
        let outcome = extend_lv(&host, &mut input).unwrap();

        assert_eq!(
            Outcome::Done(vec![Action::ExtendLv {
                device: "/dev/data_vg/app".into(),
                size: "+10G".into(),
            }]),
            outcome,
        );
        assert!(host.called("lvextend -L +10G /dev/data_vg/app"));
        assert!(!host.called("xfs_growfs"));
    }

    #[test]
    fn test_mounted_xfs_grows_through_mountpoint() {
        let host = host("xfs");
        host.respond("findmnt", 0, "/app\n");

        let mut input = Scripted::new(&["data_vg", "app", "+10G"]);
        extend_lv(&host, &mut input).unwrap();

        assert!(host.called("xfs_growfs /app"));
    }

    #[test]
    fn test_ext4_grows_through_device() {
        let host = host("ext4");
        host.respond("findmnt", 1, "");

        let mut input = Scripted::new(&["data_vg", "app", "100%FREE"]);
        extend_lv(&host, &mut input).unwrap();

        assert!(host.called("lvextend -l +100%FREE /dev/data_vg/app"));
        assert!(host.called("resize2fs /dev/data_vg/app"));
    }

    #[test]
    fn test_unsupported_fs_is_skipped() {
        let host = host("btrfs");

        let mut input = Scripted::new(&["data_vg", "app", "1G"]);
        let outcome = extend_lv(&host, &mut input).unwrap();

        assert!(matches!(outcome, Outcome::Done(ref actions) if actions.len() == 1));
        assert!(!host.called("xfs_growfs"));
        assert!(!host.called("resize2fs"));
    }

    #[test]
    fn test_missing_lv_is_reported() {
        let host = FakeHost::new();

        let mut input = Scripted::new(&["data_vg", "ghost"]);
        let outcome = extend_lv(&host, &mut input).unwrap();

        assert!(matches!(outcome, Outcome::Aborted(_)));
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn test_lvextend_failure_is_fatal() {
        let host = host("xfs");
        host.respond_err("lvextend", "  Insufficient free space");

        let mut input = Scripted::new(&["data_vg", "app", "1T"]);
        let result = extend_lv(&host, &mut input);

        assert!(matches!(result, Err(SysprovError::StepFailed { .. })));
        assert!(!host.called("blkid"));
    }
}
