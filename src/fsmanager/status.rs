use colored::Colorize;

use super::Outcome;
use crate::utils::host::Host;
use crate::utils::shell;

const VIEWS: [(&str, &[&str]); 4] = [
    ("lsblk", &["-o", "NAME,SIZE,TYPE,FSTYPE,MOUNTPOINT"]),
    ("pvs", &[]),
    ("vgs", &[]),
    ("lvs", &[]),
];

/// Prints block devices and LVM state
pub fn show(host: &dyn Host) -> Outcome {
    for (cmd, args) in VIEWS {
        println!("{}", format!("# {cmd} {}", args.join(" ")).bold());

        match shell::capture(host, cmd, args) {
            Some(output) => print!("{output}"),
            None => eprintln!("{}", format!("WARN: {cmd} failed").yellow()),
        }
    }

    Outcome::Done(vec![])
}

#[test]
fn test_show_runs_all_views() {
    use crate::utils::test_utils::FakeHost;

    let host = FakeHost::new();
    host.respond("pvs", 5, "");

    assert_eq!(Outcome::Done(vec![]), show(&host));
    assert_eq!(4, host.calls.borrow().len());
}
