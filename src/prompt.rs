use std::io::{
    BufRead,
    Write,
};

use colored::Colorize;

use crate::errors::SysprovError;

/// Source of operator answers, one line per question
pub trait Input {
    /// Shows `label` and reads one line without its line terminator.
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, label: &str) -> Result<Option<String>, SysprovError>;
}

/// Interactive standard input
pub struct Stdin;

impl Input for Stdin {
    fn read_line(&mut self, label: &str) -> Result<Option<String>, SysprovError> {
        print!("{} ", label.bold());
        std::io::stdout()
            .flush()
            .map_err(|err| SysprovError::FileError(err, "failed to flush stdout".to_string()))?;

        let mut line = String::new();
        let n = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| SysprovError::FileError(err, "failed to read stdin".to_string()))?;

        if n == 0 {
            println!();
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

fn read(input: &mut dyn Input, label: &str) -> Result<String, SysprovError> {
    match input.read_line(label)? {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(SysprovError::InputClosed),
    }
}

/// Asks for a value, using `default` if the answer is empty
pub fn ask(input: &mut dyn Input, label: &str, default: &str) -> Result<String, SysprovError> {
    let label = match default {
        "" => format!("{label}:"),
        _ => format!("{label} [{default}]:"),
    };

    let answer = read(input, &label)?;
    if answer.is_empty() {
        return Ok(default.to_string());
    }

    Ok(answer)
}

/// Asks until a non-empty answer is given
pub fn ask_required(input: &mut dyn Input, label: &str) -> Result<String, SysprovError> {
    ask_valid(input, label, "", |s| match s.is_empty() {
        true => Err("a value is required".to_string()),
        false => Ok(s.to_string()),
    })
}

/// Asks until `parse` accepts the answer (or `default` when empty)
pub fn ask_valid<T, F>(
    input: &mut dyn Input,
    label: &str,
    default: &str,
    parse: F,
) -> Result<T, SysprovError>
where
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let answer = ask(input, label, default)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(msg) => eprintln!("{}", format!("invalid answer '{answer}': {msg}").red()),
        }
    }
}

/// Asks a y/n question
pub fn confirm(input: &mut dyn Input, label: &str, default: bool) -> Result<bool, SysprovError> {
    let hint = match default {
        true => "Y/n",
        false => "y/N",
    };

    loop {
        let answer = read(input, &format!("{label} ({hint}):"))?;
        match answer.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("{}", "please answer y or n".red()),
        }
    }
}

/// Asks for an explicit "yes". Anything else, including an empty answer, is no.
pub fn confirm_yes(input: &mut dyn Input, label: &str) -> Result<bool, SysprovError> {
    let answer = read(input, &format!("{label} (yes/no) [no]:"))?;
    Ok(answer.eq_ignore_ascii_case("yes"))
}

/// Answers from a fixed list, for tests
#[cfg(test)]
pub struct Scripted {
    answers: std::collections::VecDeque<String>,
    pub labels: Vec<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            labels: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl Input for Scripted {
    fn read_line(&mut self, label: &str) -> Result<Option<String>, SysprovError> {
        self.labels.push(label.to_string());
        Ok(self.answers.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_default() {
        let mut input = Scripted::new(&["", "  ext4 "]);

        assert_eq!("xfs", ask(&mut input, "Filesystem", "xfs").unwrap());
        assert_eq!("ext4", ask(&mut input, "Filesystem", "xfs").unwrap());
        assert_eq!("Filesystem [xfs]:", input.labels[0]);

        assert!(matches!(
            ask(&mut input, "Filesystem", "xfs"),
            Err(SysprovError::InputClosed)
        ));
    }

    #[test]
    fn test_ask_valid_reprompts() {
        let mut input = Scripted::new(&["", "abc", "3"]);

        let n: usize = ask_valid(&mut input, "Count", "", |s| {
            s.parse::<usize>().map_err(|err| err.to_string())
        })
        .unwrap();

        assert_eq!(3, n);
        assert_eq!(0, input.remaining());
    }

    #[test]
    fn test_confirm() {
        let mut input = Scripted::new(&["", "maybe", "YES", "n"]);

        assert!(!confirm(&mut input, "Partition?", false).unwrap());
        assert!(confirm(&mut input, "Partition?", false).unwrap());
        assert!(!confirm(&mut input, "Partition?", true).unwrap());
    }

    #[test]
    fn test_confirm_yes_requires_yes() {
        let mut input = Scripted::new(&["", "y", "yes"]);

        assert!(!confirm_yes(&mut input, "Continue?").unwrap());
        assert!(!confirm_yes(&mut input, "Continue?").unwrap());
        assert!(confirm_yes(&mut input, "Continue?").unwrap());
    }
}
