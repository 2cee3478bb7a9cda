use std::path::Path;

use crate::errors::SysprovError;
use crate::linux::mkfs::FsType;
use crate::utils::host::Host;

/// How the mount table refers to a filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Uuid(String),
    Device(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "UUID={uuid}"),
            Self::Device(device) => write!(f, "{device}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub source: Source,
    pub mountpoint: String,
    pub fs_type: FsType,
}

impl Entry {
    pub fn to_line(&self) -> String {
        format!(
            "{}  {}  {}  defaults  0 0",
            self.source, self.mountpoint, self.fs_type
        )
    }
}

impl Source {
    /// Parses the first field of an fstab line
    fn from_field(field: &str) -> Self {
        match field.split_once('=') {
            Some((key, value)) if key.eq_ignore_ascii_case("UUID") => {
                Self::Uuid(value.trim_matches(|c| c == '"' || c == '\'').to_string())
            }
            _ => Self::Device(field.to_string()),
        }
    }

    /// Form used to compare sources. UUIDs are case-insensitive, and
    /// `/dev/<vg>/<lv>` is the same node as `/dev/mapper/<vg>-<lv>`.
    fn canonical(&self) -> String {
        match self {
            Self::Uuid(uuid) => format!("UUID={}", uuid.to_lowercase()),
            Self::Device(device) => lvm_mapper_path(device).unwrap_or_else(|| device.clone()),
        }
    }
}

// Device-mapper doubles dashes inside VG and LV names
fn lvm_mapper_path(device: &str) -> Option<String> {
    let rest = device.strip_prefix("/dev/")?;
    let (vg, lv) = rest.split_once('/')?;

    if lv.contains('/') || matches!(vg, "mapper" | "disk" | "md" | "block") {
        return None;
    }

    Some(format!(
        "/dev/mapper/{}-{}",
        vg.replace('-', "--"),
        lv.replace('-', "--")
    ))
}

/// Whether `content` already has an active entry for `source`
pub fn contains(content: &str, source: &Source) -> bool {
    let wanted = source.canonical();

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .any(|field| Source::from_field(field).canonical() == wanted)
}

/// Appends `entry` to the mount table at `path` unless its source is
/// already listed. Existing lines are never rewritten.
///
/// Returns whether a line was appended.
pub fn append_once(host: &dyn Host, path: &Path, entry: &Entry) -> Result<bool, SysprovError> {
    let content = host.read_to_string(path)?.unwrap_or_default();
    if contains(&content, &entry.source) {
        return Ok(false);
    }

    let mut line = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        line.push('\n');
    }

    line.push_str(&entry.to_line());
    line.push('\n');

    host.append(path, &line)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::FakeHost;

    const FSTAB: &str = "/etc/fstab";

    fn entry(source: Source) -> Entry {
        Entry {
            source,
            mountpoint: "/app".into(),
            fs_type: FsType::Xfs,
        }
    }

    #[test]
    fn test_to_line() {
        assert_eq!(
            "UUID=0b6a-44f1  /app  xfs  defaults  0 0",
            entry(Source::Uuid("0b6a-44f1".into())).to_line(),
        );
        assert_eq!(
            "/dev/data_vg/app  /app  xfs  defaults  0 0",
            entry(Source::Device("/dev/data_vg/app".into())).to_line(),
        );
    }

    #[test]
    fn test_contains_ignores_comments_and_prefixes() {
        let content = "# UUID=aaaa /old xfs defaults 0 0\nUUID=aaaa-1 /data xfs defaults 0 0\n";

        assert!(!contains(content, &Source::Uuid("aaaa".into())));
        assert!(contains(content, &Source::Uuid("aaaa-1".into())));
    }

    #[test]
    fn test_contains_equivalent_sources() {
        struct Test<'a> {
            content: &'a str,
            source: Source,
            expected: bool,
        }

        let tests = vec![
            Test {
                content: "UUID=\"6f1c-42aa\"  /app  xfs  defaults  0 0\n",
                source: Source::Uuid("6f1c-42aa".into()),
                expected: true,
            },
            Test {
                content: "uuid='6F1C-42AA' /app xfs defaults 0 0\n",
                source: Source::Uuid("6f1c-42aa".into()),
                expected: true,
            },
            Test {
                content: "/dev/mapper/data_vg-app  /app  xfs  defaults  0 0\n",
                source: Source::Device("/dev/data_vg/app".into()),
                expected: true,
            },
            Test {
                content: "/dev/mapper/data--vg-my--app  /app  xfs  defaults  0 0\n",
                source: Source::Device("/dev/data-vg/my-app".into()),
                expected: true,
            },
            Test {
                content: "/dev/data_vg/app  /app  xfs  defaults  0 0\n",
                source: Source::Device("/dev/data_vg/app".into()),
                expected: true,
            },
            Test {
                content: "/dev/mapper/data_vg-app2  /app  xfs  defaults  0 0\n",
                source: Source::Device("/dev/data_vg/app".into()),
                expected: false,
            },
            Test {
                content: "UUID=6f1c-42aa  /app  xfs  defaults  0 0\n",
                source: Source::Device("/dev/data_vg/app".into()),
                expected: false,
            },
        ];

        for test in tests {
            assert_eq!(
                test.expected,
                contains(test.content, &test.source),
                "content {:?}, source {:?}",
                test.content,
                test.source,
            );
        }
    }

    #[test]
    fn test_append_once_quoted_uuid() {
        let host = FakeHost::new();
        host.add_file(FSTAB, "UUID=\"6f1c-42aa\"  /app  xfs  defaults  0 0\n");

        let e = entry(Source::Uuid("6f1c-42aa".into()));
        assert!(!append_once(&host, Path::new(FSTAB), &e).unwrap());
        assert_eq!(1, host.file(FSTAB).unwrap().lines().count());
    }

    #[test]
    fn test_append_once() {
        let host = FakeHost::new();
        host.add_file(FSTAB, "/dev/sda1  /  xfs  defaults  0 0");

        let e = entry(Source::Uuid("0b6a-44f1".into()));
        assert!(append_once(&host, Path::new(FSTAB), &e).unwrap());
        assert!(!append_once(&host, Path::new(FSTAB), &e).unwrap());

        assert_eq!(
            "/dev/sda1  /  xfs  defaults  0 0\nUUID=0b6a-44f1  /app  xfs  defaults  0 0\n",
            host.file(FSTAB).unwrap(),
        );
    }

    #[test]
    fn test_append_once_creates_missing_table() {
        let host = FakeHost::new();
        let e = entry(Source::Device("/dev/data_vg/app".into()));

        assert!(append_once(&host, Path::new(FSTAB), &e).unwrap());
        assert_eq!(
            "/dev/data_vg/app  /app  xfs  defaults  0 0\n",
            host.file(FSTAB).unwrap(),
        );
    }
}
