use std::collections::HashMap;

use crate::utils::host::Host;
use crate::utils::shell;

// For parsing Linux blkid output
#[derive(Debug, Default, PartialEq)]
pub struct EntryBlkid {
    pub uuid: Option<String>,
    pub dev_type: Option<String>,
}

/// Probes `device` with blkid.
/// Returns an empty entry for devices without any signature.
pub fn probe(host: &dyn Host, device: &str) -> EntryBlkid {
    // Cached results may predate a fresh mkfs
    shell::capture(host, "blkid", &["-p", device])
        .map(|output| parse_entry(&output))
        .unwrap_or_default()
}

// Parses a single blkid line, e.g.
// /dev/mapper/vg-app: UUID="1234-abcd" BLOCK_SIZE="512" TYPE="xfs"
fn parse_entry(output: &str) -> EntryBlkid {
    let line = output.lines().next().unwrap_or_default();
    let attrs = match line.split_once(':') {
        Some((_device, attrs)) => attrs,
        None => return EntryBlkid::default(),
    };

    let pairs: HashMap<String, String> = shlex::split(attrs)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect();

    EntryBlkid {
        uuid: pairs.get("UUID").cloned(),
        dev_type: pairs.get("TYPE").cloned(),
    }
}
