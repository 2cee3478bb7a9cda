use crate::constants::SECTION_LOGIN_COUNT;
use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

/// Section with the number of sessions listed by who(1)
pub fn login_count(host: &dyn Host) -> Result<String, SysprovError> {
    let output = shell::read(host, "who", &[])?;

    Ok(render(count_sessions(&output.stdout)))
}

fn count_sessions(who: &str) -> usize {
    who.lines().filter(|line| !line.trim().is_empty()).count()
}

fn render(count: usize) -> String {
    format!("{SECTION_LOGIN_COUNT}\n{count}\n")
}
