use std::path::Path;

use colored::Colorize;

use super::disk;
use super::Outcome;
use crate::config::Config;
use crate::entity::action::{
    Action,
    Progress,
};
use crate::errors::SysprovError;
use crate::linux::lvm;
use crate::prompt::{
    self,
    Input,
};
use crate::utils::host::Host;

/// Creates a new volume group from operator-chosen devices
pub fn create_vg(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
) -> Result<Outcome, SysprovError> {
    let vg = ask_vg_name(input)?;
    if lvm::vg_exists(host, &vg) {
        return Ok(Outcome::Aborted(format!("volume group {vg} already exists")));
    }

    let devices = ask_devices(input)?;
    let mut progress = Progress::new();

    let mut pvs = Vec::new();
    for device in &devices {
        if let Some(pv) = prepare_pv(host, input, config, device, &mut progress)? {
            pvs.push(pv);
        }
    }

    if pvs.is_empty() {
        return Ok(Outcome::Aborted(format!(
            "no usable physical volumes, volume group {vg} not created"
        )));
    }

    progress.record(
        Action::CreateVg {
            vg: vg.clone(),
            pvs: pvs.clone(),
        },
        lvm::create_vg(host, &vg, &pvs),
    )?;

    println!(
        "{}",
        format!("Volume group {vg} created with {}", pvs.join(" ")).green()
    );

    Ok(Outcome::Done(progress.into_actions()))
}

/// Adds operator-chosen devices to an existing volume group, one at a time
pub fn extend_vg(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
) -> Result<Outcome, SysprovError> {
    let vg = ask_vg_name(input)?;
    if !lvm::vg_exists(host, &vg) {
        return Ok(Outcome::Aborted(format!("no such volume group {vg}")));
    }

    let devices = ask_devices(input)?;
    let mut progress = Progress::new();

    let mut added = Vec::new();
    for device in &devices {
        let pv = match prepare_pv(host, input, config, device, &mut progress)? {
            Some(pv) => pv,
            None => continue,
        };

        progress.record(
            Action::ExtendVg {
                vg: vg.clone(),
                pv: pv.clone(),
            },
            lvm::extend_vg(host, &vg, &pv),
        )?;

        println!("{}", format!("Added {pv} to volume group {vg}").green());
        added.push(pv);
    }

    if added.is_empty() {
        return Ok(Outcome::Aborted(format!(
            "no usable physical volumes, volume group {vg} not extended"
        )));
    }

    Ok(Outcome::Done(progress.into_actions()))
}

/// Prepares one operator device and initializes it as a PV.
///
/// Returns `None` if the confirmed target is not a block device.
fn prepare_pv(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
    device: &str,
    progress: &mut Progress,
) -> Result<Option<String>, SysprovError> {
    let target = disk::prepare_device(host, input, config, device, progress)?;
    let target = prompt::ask(input, "Device to use as physical volume", &target)?;

    if !host.is_block_device(Path::new(&target)) {
        eprintln!(
            "{}",
            format!("ERROR: {target} is not a block device, skipping").red()
        );
        return Ok(None);
    }

    if lvm::is_pv(host, &target) {
        println!("{target} is already a physical volume, reusing it");
        progress.push(Action::ReusePv(target.clone()));
        return Ok(Some(target));
    }

    progress.record(
        Action::CreatePv(target.clone()),
        lvm::create_pv(host, &target),
    )?;

    Ok(Some(target))
}

fn ask_vg_name(input: &mut dyn Input) -> Result<String, SysprovError> {
    prompt::ask_valid(input, "Volume group name", "", |s| {
        lvm::validate_name(s)?;
        Ok(s.to_string())
    })
}

fn ask_devices(input: &mut dyn Input) -> Result<Vec<String>, SysprovError> {
    prompt::ask_valid(input, "Devices (space separated, e.g. /dev/sdb /dev/sdc)", "", |s| {
        match shlex::split(s) {
            Some(devices) if !devices.is_empty() => Ok(devices),
            Some(_) => Err("at least one device is required".to_string()),
            None => Err("unbalanced quotes".to_string()),
        }
    })
}
