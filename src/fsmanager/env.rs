use colored::Colorize;

use crate::constants::{
    GROW_COMMANDS,
    REQUIRED_COMMANDS,
};
use crate::errors::SysprovError;
use crate::linux::os::{
    self,
    OsFamily,
};
use crate::prompt::{
    self,
    Input,
};
use crate::utils::host::Host;

#[derive(Debug, PartialEq)]
pub enum ToolCheck {
    Pass,
    /// Some tools are missing, but the operator chose to continue
    Degraded(Vec<String>),
}

/// Detects the OS family and checks the tools fs-manager runs.
/// Nothing is ever installed; missing tools need an explicit "yes".
pub fn probe(host: &dyn Host, input: &mut dyn Input) -> Result<(OsFamily, ToolCheck), SysprovError> {
    let family = os::detect_os(host)?;
    println!(
        "Detected {family} family (package manager: {})",
        family.package_manager()
    );

    let tools = REQUIRED_COMMANDS.iter().chain(GROW_COMMANDS.iter());
    let check = check_tools(host, input, family, tools.copied())?;

    Ok((family, check))
}

pub fn check_tools<'a, I>(
    host: &dyn Host,
    input: &mut dyn Input,
    family: OsFamily,
    tools: I,
) -> Result<ToolCheck, SysprovError>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing: Vec<String> = tools
        .into_iter()
        .filter(|tool| !host.in_path(tool))
        .map(String::from)
        .collect();

    if missing.is_empty() {
        return Ok(ToolCheck::Pass);
    }

    for tool in &missing {
        let hint = match family.package_for(tool) {
            Some(package) => format!(" (try: {} install {package})", family.package_manager()),
            None => String::new(),
        };

        eprintln!("{}", format!("WARN: missing command {tool}{hint}").yellow());
    }

    if !prompt::confirm_yes(input, "Some tools are missing. Continue anyway?")? {
        return Err(SysprovError::Aborted(format!(
            "missing commands: {}",
            missing.join(" ")
        )));
    }

    Ok(ToolCheck::Degraded(missing))
}
