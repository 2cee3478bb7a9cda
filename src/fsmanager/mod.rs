mod disk;
mod env;
mod lv;
mod resize;
mod status;
mod vg;

use colored::Colorize;

use crate::config::Config;
use crate::entity::action::Action;
use crate::entity::report::Report;
use crate::errors::SysprovError;
use crate::prompt::Input;
use crate::utils::host::Host;

/// Result of a menu step that did not fail fatally
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Done(Vec<Action>),
    /// Nothing destructive happened; control goes back to the menu
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    CreateVg,
    ExtendVg,
    CreateLvs,
    ExtendLv,
    Status,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 6] = [
        Self::CreateVg,
        Self::ExtendVg,
        Self::CreateLvs,
        Self::ExtendLv,
        Self::Status,
        Self::Exit,
    ];

    fn title(&self) -> &'static str {
        match self {
            Self::CreateVg => "Create New VG",
            Self::ExtendVg => "Extend Existing VG",
            Self::CreateLvs => "Create LV(s)",
            Self::ExtendLv => "Extend LV and grow filesystem",
            Self::Status => "Show disks and LVM status",
            Self::Exit => "Exit",
        }
    }

    fn step(&self) -> &'static str {
        match self {
            Self::CreateVg => "create-vg",
            Self::ExtendVg => "extend-vg",
            Self::CreateLvs => "create-lvs",
            Self::ExtendLv => "extend-lv",
            Self::Status => "status",
            Self::Exit => "exit",
        }
    }

    fn from_selection(s: &str) -> Option<Self> {
        let n: usize = s.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }
}

/// Probes the environment, then runs the menu until the operator exits.
///
/// Fatal step failures end the loop with an error; partial changes
/// already made on the system are left as they are.
pub fn run(host: &dyn Host, input: &mut dyn Input, config: &Config) -> Result<(), SysprovError> {
    env::probe(host, input)?;
    menu_loop(host, input, config)
}

fn menu_loop(host: &dyn Host, input: &mut dyn Input, config: &Config) -> Result<(), SysprovError> {
    loop {
        println!();
        println!("{}", "=== LVM / filesystem manager ===".bold());
        for (i, item) in MenuItem::ALL.iter().enumerate() {
            println!("{}) {}", i + 1, item.title());
        }

        let selection = match input.read_line("Select an option:")? {
            Some(line) => line,
            None => return Err(SysprovError::InputClosed),
        };

        let item = match MenuItem::from_selection(&selection) {
            Some(item) => item,
            None => {
                eprintln!("{}", format!("Invalid option '{}'", selection.trim()).red());
                continue;
            }
        };

        let start = std::time::Instant::now();
        let outcome = match item {
            MenuItem::CreateVg => vg::create_vg(host, input, config)?,
            MenuItem::ExtendVg => vg::extend_vg(host, input, config)?,
            MenuItem::CreateLvs => lv::create_lvs(host, input, config)?,
            MenuItem::ExtendLv => resize::extend_lv(host, input)?,
            MenuItem::Status => status::show(host),
            MenuItem::Exit => {
                println!("Bye");
                return Ok(());
            }
        };

        match outcome {
            Outcome::Done(actions) => {
                let report = Report {
                    step: item.step(),
                    actions,
                    duration: start.elapsed(),
                };

                tracing::info!("{report}");
            }
            Outcome::Aborted(reason) => {
                eprintln!("{}", format!("{}: {reason}", item.title()).yellow());
            }
        }
    }
}
