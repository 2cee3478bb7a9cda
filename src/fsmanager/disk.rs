use std::path::Path;

use colored::Colorize;

use crate::config::Config;
use crate::entity::action::{
    Action,
    Progress,
};
use crate::entity::SizeToken;
use crate::errors::SysprovError;
use crate::linux::fdisk::{
    self,
    PartitionTable,
};
use crate::prompt::{
    self,
    Input,
};
use crate::utils::host::Host;

/// Optionally partitions `device` and returns the device to use as PV.
///
/// Declining returns `device` itself. If the new partition cannot be
/// found, the failure is shown and the whole disk is returned; callers
/// let the operator confirm or override the result.
pub fn prepare_device(
    host: &dyn Host,
    input: &mut dyn Input,
    config: &Config,
    device: &str,
    progress: &mut Progress,
) -> Result<String, SysprovError> {
    if !prompt::confirm(input, &format!("Partition {device}?"), false)? {
        return Ok(device.to_string());
    }

    let end = prompt::ask_valid(
        input,
        "Partition size (e.g. +10G, empty for remaining space)",
        "",
        parse_partition_end,
    )?;
    let lvm_type = prompt::confirm(input, "Set partition type to Linux LVM?", false)?;

    let table = PartitionTable::detect(host, device);
    let before = fdisk::list_partitions(host, device);
    let cmd = fdisk::create_partition_cmd(&table, end.as_deref(), lvm_type, before.len());

    progress.record(
        Action::CreatePartition {
            device: device.to_string(),
            size: end.clone().unwrap_or_else(|| "remaining".to_string()),
            lvm: lvm_type,
        },
        fdisk::run_fdisk_cmd(host, device, &cmd),
    )?;

    if fdisk::reread_partition_table(host, device) {
        progress.push(Action::RereadPartitionTable {
            device: device.to_string(),
        });
    } else {
        eprintln!(
            "{}",
            format!("WARN: kernel did not re-read partition table of {device}").yellow()
        );
    }

    host.settle(config.settle);

    let after = fdisk::list_partitions(host, device);
    let detected = fdisk::detect_new_partition(device, &before, &after, |node| {
        host.is_block_device(Path::new(node))
    });

    match detected {
        Some(partition) => {
            println!("{}", format!("Created partition {partition}").green());
            Ok(partition)
        }
        None => {
            eprintln!(
                "{}",
                format!("ERROR: could not detect the new partition on {device}, falling back to the whole disk")
                    .red()
            );
            Ok(device.to_string())
        }
    }
}

// Empty means remaining space. fdisk wants sizes with a leading +.
fn parse_partition_end(s: &str) -> Result<Option<String>, String> {
    if s.is_empty() {
        return Ok(None);
    }

    let size = SizeToken::parse(s).map_err(|err| err.to_string())?;
    if size.is_extents() {
        return Err("partition sizes must be byte sizes, e.g. +10G".to_string());
    }

    Ok(Some(size.into_relative().to_string()))
}
