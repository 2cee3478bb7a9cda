use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

/// Restarts `service` with systemctl, or the SysV `service` wrapper
/// on hosts without systemd.
pub fn restart(host: &dyn Host, service: &str) -> Result<(), SysprovError> {
    if host.in_path("systemctl") {
        shell::run(host, "systemctl", &["restart", service])?;
        return Ok(());
    }

    shell::run(host, "service", &[service, "restart"])?;

    Ok(())
}

#[test]
fn test_restart_without_systemd() {
    use crate::utils::test_utils::FakeHost;

    let host = FakeHost::new();
    restart(&host, "sshd").unwrap();

    host.set_missing("systemctl");
    restart(&host, "ssh").unwrap();

    assert_eq!(
        vec!["systemctl restart sshd", "service ssh restart"],
        *host.calls.borrow(),
    );
}
