use chrono::NaiveDate;

use crate::config::Config;
use crate::constants::{
    EXPIRY_CRIT_DAYS,
    EXPIRY_WARN_DAYS,
    SECTION_PASSWORD_EXPIRY,
    UID_MIN,
    UID_NOBODY,
};
use crate::errors::SysprovError;
use crate::utils::host::Host;
use crate::utils::shell;

#[derive(Debug, PartialEq)]
enum Expiry {
    Never,
    On(NaiveDate),
}

/// Section with one line per human account whose password expires:
/// `<user> <days left> <severity>`, severity 0 ok, 1 warn, 2 crit.
pub fn password_expiry(
    host: &dyn Host,
    config: &Config,
    today: NaiveDate,
) -> Result<String, SysprovError> {
    let passwd = host.read_to_string(&config.passwd)?.ok_or_else(|| {
        SysprovError::FileError(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            format!("no passwd file {}", config.passwd.display()),
        )
    })?;

    let mut section = format!("{SECTION_PASSWORD_EXPIRY}\n");
    for user in human_users(&passwd) {
        let chage = match shell::capture(host, "chage", &["-l", &user]) {
            Some(output) => output,
            None => {
                tracing::warn!(user, "chage failed, skipping user");
                continue;
            }
        };

        let date = match parse_chage(&chage) {
            Some(Expiry::On(date)) => date,
            Some(Expiry::Never) | None => continue,
        };

        let days_left = (date - today).num_days();
        section.push_str(&format!("{user} {days_left} {}\n", severity(days_left)));
    }

    Ok(section)
}

fn human_users(passwd: &str) -> Vec<String> {
    passwd
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            let uid: u32 = fields.get(2)?.parse().ok()?;

            match uid >= UID_MIN && uid != UID_NOBODY {
                true => Some(fields[0].to_string()),
                false => None,
            }
        })
        .collect()
}

// Parses the "Password expires" line of `LC_ALL=C chage -l`
fn parse_chage(output: &str) -> Option<Expiry> {
    let value = output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        match key.trim() == "Password expires" {
            true => Some(value.trim()),
            false => None,
        }
    })?;

    if value == "never" {
        return Some(Expiry::Never);
    }

    NaiveDate::parse_from_str(value, "%b %d, %Y")
        .ok()
        .map(Expiry::On)
}

fn severity(days_left: i64) -> u8 {
    if days_left <= EXPIRY_CRIT_DAYS {
        return 2;
    }

    if days_left <= EXPIRY_WARN_DAYS {
        return 1;
    }

    0
}
