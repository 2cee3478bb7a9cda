use crate::entity::SizeToken;
use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

/// Executes:
/// ```shell
/// pvcreate ${{ pv }}
/// ```
pub fn create_pv(host: &dyn Host, pv: &str) -> Result<(), SysprovError> {
    shell::run(host, "pvcreate", &[pv])?;

    Ok(())
}

/// Executes:
/// ```shell
/// vgcreate ${{ vg }} ${{ pvs }}
/// ```
pub fn create_vg(host: &dyn Host, vg: &str, pvs: &[String]) -> Result<(), SysprovError> {
    let mut args = vec![vg];
    args.extend(pvs.iter().map(|pv| pv.as_str()));

    shell::run(host, "vgcreate", &args)?;

    Ok(())
}

/// Executes:
/// ```shell
/// vgextend ${{ vg }} ${{ pv }}
/// ```
pub fn extend_vg(host: &dyn Host, vg: &str, pv: &str) -> Result<(), SysprovError> {
    shell::run(host, "vgextend", &[vg, pv])?;

    Ok(())
}

/// Executes:
/// ```shell
/// lvcreate -y -L ${{ size }} -n ${{ lv }} ${{ vg }}
///
/// # or, for extent sizes such as 100%FREE:
///
/// lvcreate -y -l ${{ size }} -n ${{ lv }} ${{ vg }}
/// ```
pub fn create_lv(host: &dyn Host, vg: &str, lv: &str, size: &SizeToken) -> Result<(), SysprovError> {
    let (size_flag, size) = size.lvm_arg();

    shell::run(host, "lvcreate", &["-y", size_flag, &size, "-n", lv, vg])?;

    Ok(())
}

/// Executes:
/// ```shell
/// lvextend -L +${{ size }} ${{ device }}
/// ```
pub fn extend_lv(host: &dyn Host, device: &str, size: &SizeToken) -> Result<(), SysprovError> {
    let (size_flag, size) = size.clone().into_relative().lvm_arg();

    shell::run(host, "lvextend", &[size_flag, &size, device])?;

    Ok(())
}

pub fn lv_path(vg: &str, lv: &str) -> String {
    format!("/dev/{vg}/{lv}")
}

/// Whether `device` already carries a PV label
pub fn is_pv(host: &dyn Host, device: &str) -> bool {
    shell::capture(host, "pvs", &["--noheadings", device]).is_some()
}

pub fn vg_names(host: &dyn Host) -> Vec<String> {
    shell::capture(host, "vgs", &["--noheadings", "-o", "vg_name"])
        .map(|output| {
            output
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

pub fn vg_exists(host: &dyn Host, vg: &str) -> bool {
    vg_names(host).iter().any(|name| name == vg)
}

/// Rejects names LVM would refuse
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty name".to_string());
    }

    if name.starts_with('-') || name == "." || name == ".." {
        return Err(format!("name {name} is reserved"));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));

    if !valid_chars {
        return Err(format!("name {name} may only contain a-z A-Z 0-9 . _ - +"));
    }

    Ok(())
}
