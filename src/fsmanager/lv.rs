use std::path::Path;

use colored::Colorize;

use super::Outcome;
use crate::config::Config;
use crate::constants::defaults;
use crate::entity::action::{
    Action,
    Progress,
};
use crate::entity::SizeToken;
use crate::errors::SysprovError;
use crate::fstab;
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

struct LvRequest {
    name: String,
    size: SizeToken,
    fs_type: FsType,
    mountpoint: String,
}

/// Creates, formats, mounts and records one or more logical volumes
pub fn create_lvs(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
) -> Result<Outcome, SysprovError> {
    let vg = prompt::ask_required(input, "Volume group")?;
    if !lvm::vg_exists(host, &vg) {
        return Ok(Outcome::Aborted(format!("no such volume group {vg}")));
    }

    let count: usize = prompt::ask_valid(input, "How many logical volumes", "1", |s| {
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err("expecting a positive number".to_string()),
        }
    })?;

    let mut progress = Progress::new();
    for i in 1..=count {
        println!("{}", format!("Logical volume {i}/{count}").bold());

        let request = ask_lv(input)?;
        create_lv(host, config, &vg, &request, &mut progress)?;
    }

    Ok(Outcome::Done(progress.into_actions()))
}

fn ask_lv(input: &mut dyn Input) -> Result<LvRequest, SysprovError> {
    let name = prompt::ask_valid(input, "Logical volume name", "", |s| {
        lvm::validate_name(s)?;
        Ok(s.to_string())
    })?;

    let size = prompt::ask_valid(input, "Size (e.g. 50G, 100%FREE)", "", |s| {
        SizeToken::parse(s).map_err(|err| err.to_string())
    })?;

    let fs_type = prompt::ask_valid(input, "Filesystem type (xfs/ext4)", defaults::FS_TYPE, |s| {
        s.parse::<FsType>().map_err(|err| err.to_string())
    })?;

    let mountpoint = prompt::ask_valid(input, "Mount point", "", |s| {
        match s.starts_with('/') && s != "/" {
            true => Ok(s.trim_end_matches('/').to_string()),
            false => Err("expecting an absolute path other than /".to_string()),
        }
    })?;

    Ok(LvRequest {
        name,
        size,
        fs_type,
        mountpoint,
    })
}

fn create_lv(
    host: &dyn Host,
    config: &Config,
    vg: &str,
    request: &LvRequest,
    progress: &mut Progress,
) -> Result<(), SysprovError> {
    let device = lvm::lv_path(vg, &request.name);

    progress.record(
        Action::CreateLv {
            vg: vg.to_string(),
            lv: request.name.clone(),
            size: request.size.to_string(),
        },
        lvm::create_lv(host, vg, &request.name, &request.size),
    )?;

    progress.record(
        Action::CreateFs {
            device: device.clone(),
            fs_type: request.fs_type,
        },
        mkfs::create_fs(host, &device, request.fs_type),
    )?;

    let mountpoint = Path::new(&request.mountpoint);
    if !host.exists(mountpoint) {
        progress.record(
            Action::Mkdir(request.mountpoint.clone()),
            host.create_dir_all(mountpoint),
        )?;
    }

    progress.record(
        Action::MountFs {
            src: device.clone(),
            dst: request.mountpoint.clone(),
        },
        mount::mount_fs(host, &device, &request.mountpoint),
    )?;

    let source = match blkid::probe(host, &device).uuid {
        Some(uuid) => fstab::Source::Uuid(uuid),
        None => {
            eprintln!(
                "{}",
                format!("WARN: no UUID found for {device}, recording it by device path").yellow()
            );
            fstab::Source::Device(device.clone())
        }
    };

    let entry = fstab::Entry {
        source,
        mountpoint: request.mountpoint.clone(),
        fs_type: request.fs_type,
    };

    let appended = progress.record_changed(
        Action::AppendFstab(entry.to_line()),
        fstab::append_once(host, &config.fstab, &entry),
    )?;

    if !appended {
        println!(
            "{} already has an entry for {}, not adding another",
            config.fstab.display(),
            entry.source
        );
    }

    println!(
        "{}",
        format!(
            "Logical volume {device} ({}) mounted on {}",
            request.fs_type, request.mountpoint
        )
        .green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Scripted;
    use crate::utils::test_utils::FakeHost;

    const BLKID_APP: &str =
        "/dev/data_vg/app: UUID=\"6f1c-42aa\" BLOCK_SIZE=\"512\" TYPE=\"xfs\"\n";

    fn host() -> FakeHost {
        let host = FakeHost::new();
        host.respond("vgs", 0, "  data_vg\n");
        host.respond("blkid -p /dev/data_vg/app", 0, BLKID_APP);
        host
    }

    #[test]
    fn test_create_single_lv_defaults_to_xfs() {
        let host = host();
        host.add_file("/etc/fstab", "/dev/sda1  /  xfs  defaults  0 0\n");

        let mut input = Scripted::new(&["data_vg", "1", "app", "50G", "", "/app"]);
        let outcome = create_lvs(&host, &mut input, &Config::default()).unwrap();

        assert_eq!(
            vec![
                "vgs --noheadings -o vg_name",
                "lvcreate -y -L 50G -n app data_vg",
                "mkfs.xfs -f /dev/data_vg/app",
                "mount /dev/data_vg/app /app",
                "blkid -p /dev/data_vg/app",
            ],
            *host.calls.borrow(),
        );
        assert!(host.dirs.borrow().contains(Path::new("/app")));
        assert_eq!(
            "/dev/sda1  /  xfs  defaults  0 0\nUUID=6f1c-42aa  /app  xfs  defaults  0 0\n",
            host.file("/etc/fstab").unwrap(),
        );

        match outcome {
            Outcome::Done(actions) => assert_eq!(5, actions.len()),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_fstab_not_duplicated() {
        let host = host();
        host.add_dir("/app");
        host.add_file("/etc/fstab", "UUID=6f1c-42aa  /app  xfs  defaults  0 0\n");

        let mut input = Scripted::new(&["data_vg", "", "app", "50G", "xfs", "/app"]);
        let outcome = create_lvs(&host, &mut input, &Config::default()).unwrap();

        let fstab = host.file("/etc/fstab").unwrap();
        assert_eq!(1, fstab.matches("UUID=6f1c-42aa").count());

        match outcome {
            Outcome::Done(actions) => {
                assert_eq!(3, actions.len());
                assert!(!actions
                    .iter()
                    .any(|action| matches!(action, Action::AppendFstab(_))));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_fstab_quoted_uuid_not_duplicated() {
        let host = host();
        host.add_dir("/app");
        host.add_file("/etc/fstab", "UUID=\"6F1C-42AA\"  /app  xfs  defaults  0 0\n");

        let mut input = Scripted::new(&["data_vg", "", "app", "50G", "xfs", "/app"]);
        create_lvs(&host, &mut input, &Config::default()).unwrap();

        assert_eq!(
            "UUID=\"6F1C-42AA\"  /app  xfs  defaults  0 0\n",
            host.file("/etc/fstab").unwrap(),
        );
    }

    #[test]
    fn test_device_path_fallback_and_ext4() {
        let host = host();
        host.respond("blkid -p /dev/data_vg/db", 2, "");

        let mut input = Scripted::new(&["data_vg", "1", "db", "100%FREE", "ext4", "/srv/db/"]);
        create_lvs(&host, &mut input, &Config::default()).unwrap();

        assert!(host.called("lvcreate -y -l 100%FREE -n db data_vg"));
        assert!(host.called("mkfs.ext4 -F /dev/data_vg/db"));
        assert_eq!(
            "/dev/data_vg/db  /srv/db  ext4  defaults  0 0\n",
            host.file("/etc/fstab").unwrap(),
        );
    }

    #[test]
    fn test_mkfs_failure_stops_everything() {
        let host = host();
        host.respond_err("mkfs.xfs", "mkfs.xfs: cannot open /dev/data_vg/app");

        let mut input = Scripted::new(&["data_vg", "2", "app", "50G", "", "/app", "b"]);
        let result = create_lvs(&host, &mut input, &Config::default());

        assert!(matches!(result, Err(SysprovError::StepFailed { .. })));
        assert!(!host.called("mount"));
        assert_eq!(None, host.file("/etc/fstab"));
        assert_eq!(1, input.remaining());
    }

    #[test]
    fn test_missing_vg_is_reported() {
        let host = FakeHost::new();
        let mut input = Scripted::new(&["nope"]);

        let outcome = create_lvs(&host, &mut input, &Config::default()).unwrap();
        assert!(matches!(outcome, Outcome::Aborted(_)));
        assert!(!host.called("lvcreate"));
    }
}
