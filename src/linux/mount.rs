use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

pub fn mount_fs(host: &dyn Host, device: &str, mountpoint: &str) -> Result<(), SysprovError> {
    shell::run(host, "mount", &[device, mountpoint])?;

    Ok(())
}

/// First mountpoint of `device`, if it is mounted
pub fn find_mountpoint(host: &dyn Host, device: &str) -> Option<String> {
    shell::capture(host, "findmnt", &["-n", "-o", "TARGET", "--source", device]).and_then(
        |output| {
            output
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(String::from)
        },
    )
}

#[test]
fn test_find_mountpoint() {
    use crate::utils::test_utils::FakeHost;

    let host = FakeHost::new();
    host.respond("findmnt -n -o TARGET --source /dev/vg/app", 0, "/app\n/srv/app\n");
    host.respond("findmnt -n -o TARGET --source /dev/vg/db", 1, "");

    assert_eq!(Some("/app".to_string()), find_mountpoint(&host, "/dev/vg/app"));
    assert_eq!(None, find_mountpoint(&host, "/dev/vg/db"));
}
