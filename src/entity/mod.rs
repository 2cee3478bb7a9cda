pub mod action;
pub mod report;

use humanize_rs::bytes;

use crate::errors::SysprovError;

pub fn parse_human_bytes(s: &str) -> Result<bytes::Bytes, SysprovError> {
    (s.to_lowercase())
        .parse::<bytes::Bytes>()
        .map_err(|err| SysprovError::BadInput(format!("bad byte unit string {s}: {err}")))
}

/// A size as typed by the operator, e.g. `50G`, `+10G` or `100%FREE`.
///
/// Byte sizes are handed to LVM with `-L`, extent percentages with `-l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeToken {
    Bytes { relative: bool, size: String },
    Extents { relative: bool, size: String },
}

const EXTENT_BASES: [&str; 4] = ["FREE", "VG", "PVS", "ORIGIN"];

impl SizeToken {
    pub fn parse(s: &str) -> Result<Self, SysprovError> {
        let s = s.trim();
        let (relative, size) = match s.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if size.is_empty() {
            return Err(SysprovError::BadInput("empty size".to_string()));
        }

        if let Some((pct, base)) = size.split_once('%') {
            let pct_ok = !pct.is_empty() && pct.chars().all(|c| c.is_ascii_digit());
            if !pct_ok || !EXTENT_BASES.contains(&base.to_uppercase().as_str()) {
                return Err(SysprovError::BadInput(format!(
                    "bad extent size {s}, expecting e.g. 100%FREE"
                )));
            }

            return Ok(Self::Extents {
                relative,
                size: format!("{pct}%{}", base.to_uppercase()),
            });
        }

        parse_human_bytes(size)?;

        Ok(Self::Bytes {
            relative,
            size: normalize_unit(size),
        })
    }

    /// LVM flag and value, e.g. `("-L", "+10G")`
    pub fn lvm_arg(&self) -> (&'static str, String) {
        match self {
            Self::Bytes { relative, size } => ("-L", with_sign(*relative, size)),
            Self::Extents { relative, size } => ("-l", with_sign(*relative, size)),
        }
    }

    /// Same size, but relative to the current allocation
    pub fn into_relative(self) -> Self {
        match self {
            Self::Bytes { size, .. } => Self::Bytes { relative: true, size },
            Self::Extents { size, .. } => Self::Extents { relative: true, size },
        }
    }

    pub fn is_extents(&self) -> bool {
        matches!(self, Self::Extents { .. })
    }
}

impl std::fmt::Display for SizeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lvm_arg().1)
    }
}

// "10 GiB" => "10G", "512m" => "512M"
fn normalize_unit(size: &str) -> String {
    let size: String = size.chars().filter(|c| !c.is_whitespace()).collect();
    let digits: String = size.chars().take_while(|c| c.is_ascii_digit()).collect();

    match size[digits.len()..].chars().next() {
        Some(unit) => format!("{digits}{}", unit.to_ascii_uppercase()),
        None => digits,
    }
}

fn with_sign(relative: bool, size: &str) -> String {
    match relative {
        true => format!("+{size}"),
        false => size.to_string(),
    }
}

#[test]
fn test_parse_human_bytes() {
    for v in ["1G", "50G", "512m", "10 GiB", "1TB", "0k"] {
        if let Err(err) = parse_human_bytes(v) {
            panic!("{v} should be valid, but was invalid: {err}");
        }
    }

    for v in ["G", "-1G", "10.29 GB", "kibibyte", "2000EiB"] {
        if let Ok(bytes) = parse_human_bytes(v) {
            panic!("{v} should be invalid, but got {bytes:?}");
        }
    }
}

#[test]
fn test_size_token() {
    struct Test<'a> {
        input: &'a str,
        flag: &'a str,
        value: &'a str,
    }

    let tests = vec![
        Test { input: "50G", flag: "-L", value: "50G" },
        Test { input: "+10G", flag: "-L", value: "+10G" },
        Test { input: "512m", flag: "-L", value: "512M" },
        Test { input: " 10 GiB ", flag: "-L", value: "10G" },
        Test { input: "100%FREE", flag: "-l", value: "100%FREE" },
        Test { input: "+50%free", flag: "-l", value: "+50%FREE" },
    ];

    for test in tests {
        let token = SizeToken::parse(test.input)
            .unwrap_or_else(|err| panic!("{} should be valid: {err}", test.input));

        let (flag, value) = token.lvm_arg();
        assert_eq!(test.flag, flag);
        assert_eq!(test.value, value);
    }

    for bad in ["", "+", "G", "10.5G", "%FREE", "100%DISK", "x%FREE"] {
        assert!(SizeToken::parse(bad).is_err(), "{bad} should be invalid");
    }

    let relative = SizeToken::parse("10G").unwrap().into_relative();
    assert_eq!("+10G", relative.to_string());
}
