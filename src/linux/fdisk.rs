use serde::{
    Deserialize,
    Serialize,
};

use super::{
    partition_name,
    partition_number,
};
use crate::constants::{
    LVM_PART_TYPE_DOS,
    LVM_PART_TYPE_GPT,
};
use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum PartitionTable {
    #[serde(rename = "gpt")]
    Gpt,

    #[serde(rename = "mbr", alias = "dos", alias = "mbr-dos")]
    Mbr,
}

impl PartitionTable {
    /// Reads the disk label. A blank disk gets a DOS label from fdisk.
    pub fn detect(host: &dyn Host, device: &str) -> Self {
        let pttype = shell::capture(host, "blkid", &["-o", "value", "-s", "PTTYPE", device]);

        match pttype.as_deref().map(str::trim) {
            Some("gpt") => Self::Gpt,
            _ => Self::Mbr,
        }
    }
}

/// Directives for a new partition at the default number and start.
///
/// `end` is fdisk's "last sector" answer, e.g. `+10G`; `None` uses the
/// remaining space. `existing` is the number of partitions before this one,
/// since fdisk only asks which partition to retype when there is a choice.
pub fn create_partition_cmd(
    table: &PartitionTable,
    end: Option<&str>,
    lvm_type: bool,
    existing: usize,
) -> String {
    let end = end.unwrap_or("");

    let mut directives = match table {
        PartitionTable::Gpt => vec!["n", "", "", end],
        PartitionTable::Mbr => vec![
            "n", "p", // Only create primary msdos partition for now
            "", "", end,
        ],
    };

    if lvm_type {
        directives.push("t");
        if existing > 0 {
            // Default is the last partition
            directives.push("");
        }

        directives.push(match table {
            PartitionTable::Gpt => LVM_PART_TYPE_GPT,
            PartitionTable::Mbr => LVM_PART_TYPE_DOS,
        });
    }

    directives.push("w");

    join_newlines(&directives)
}

pub fn run_fdisk_cmd(host: &dyn Host, device: &str, cmd: &str) -> Result<(), SysprovError> {
    shell::run_with_stdin(host, "fdisk", &[device], cmd)?;

    Ok(())
}

/// Asks the kernel to re-read the partition table of `device`,
/// falling back from partprobe to partx.
///
/// Returns false if neither worked.
pub fn reread_partition_table(host: &dyn Host, device: &str) -> bool {
    if shell::run(host, "partprobe", &[device]).is_ok() {
        return true;
    }

    tracing::info!(device, "partprobe failed, trying partx");
    shell::run(host, "partx", &["-u", device]).is_ok()
}

/// Lists partition device paths of `device`, in lsblk order
pub fn list_partitions(host: &dyn Host, device: &str) -> Vec<String> {
    shell::capture(host, "lsblk", &["-lnpo", "NAME,TYPE", device])
        .map(|output| parse_lsblk_partitions(&output))
        .unwrap_or_default()
}

// Parses `lsblk -lnpo NAME,TYPE` output
fn parse_lsblk_partitions(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(name), Some("part")) => Some(name.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// Picks the partition created between the `before` and `after` listings.
///
/// If several appeared, the highest-numbered wins. If lsblk did not list
/// any, the kernel's name for the next partition is tried via `node_exists`.
pub fn detect_new_partition<F>(
    disk: &str,
    before: &[String],
    after: &[String],
    node_exists: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let newest = after
        .iter()
        .filter(|part| !before.contains(part))
        .max_by_key(|part| partition_number(part).unwrap_or(0));

    if let Some(part) = newest {
        return Some(part.clone());
    }

    let next_number = before
        .iter()
        .filter_map(|part| partition_number(part))
        .max()
        .unwrap_or(0)
        + 1;

    let predicted = partition_name(disk, next_number);
    match !after.contains(&predicted) && node_exists(&predicted) {
        true => Some(predicted),
        false => None,
    }
}

fn join_newlines(slice: &[&str]) -> String {
    let mut joined = slice.join("\n");
    joined.push('\n');

    joined
}
