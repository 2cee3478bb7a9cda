/// Makes `key value` the single effective setting of `key` in the global
/// section of an sshd_config text. Returns `None` if already in place.
///
/// Existing active lines for `key` are rewritten in place (duplicates are
/// dropped). Otherwise a commented default such as `#PubkeyAuthentication no`
/// is uncommented and set, and failing that the directive is inserted before
/// the first `Match` block, or appended.
pub fn ensure_directive(original: &str, key: &str, value: &str) -> Option<String> {
    let directive = format!("{key} {value}");
    let mut lines: Vec<String> = original.lines().map(String::from).collect();

    // Only the global section applies to every connection
    let global_end = lines
        .iter()
        .position(|line| keyword(line).is_some_and(|k| k.eq_ignore_ascii_case("Match")))
        .unwrap_or(lines.len());

    let active: Vec<usize> = (0..global_end)
        .filter(|&i| keyword(&lines[i]).is_some_and(|k| k.eq_ignore_ascii_case(key)))
        .collect();

    match active.split_first() {
        Some((&first, rest)) => {
            if lines[first].trim() == directive && rest.is_empty() {
                return None;
            }

            lines[first] = directive;
            for &i in rest.iter().rev() {
                lines.remove(i);
            }
        }

        None => {
            let commented = (0..global_end).find(|&i| {
                commented_keyword(&lines[i]).is_some_and(|k| k.eq_ignore_ascii_case(key))
            });

            match commented {
                Some(i) => lines[i] = directive,
                None => lines.insert(global_end, directive),
            }
        }
    }

    let mut updated = lines.join("\n");
    updated.push('\n');

    Some(updated)
}

fn keyword(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }

    line.split_whitespace().next()
}

// Comment markers may be followed by up to a few spaces
fn commented_keyword(line: &str) -> Option<&str> {
    let uncommented = line.trim_start().strip_prefix('#')?;
    let trimmed = uncommented.trim_start_matches(' ');

    match uncommented.len() - trimmed.len() <= 4 {
        true => trimmed.split_whitespace().next(),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_directive() {
        struct Test<'a> {
            original: &'a str,
            expected: Option<&'a str>,
        }

        let tests = vec![
            // Already in place
            Test {
                original: "Port 22\nPubkeyAuthentication yes\n",
                expected: None,
            },
            // Conflicting value rewritten in place
            Test {
                original: "Port 22\npubkeyauthentication no\nUsePAM yes\n",
                expected: Some("Port 22\nPubkeyAuthentication yes\nUsePAM yes\n"),
            },
            // Duplicates dropped
            Test {
                original: "PubkeyAuthentication yes\nX11Forwarding no\nPubkeyAuthentication no\n",
                expected: Some("PubkeyAuthentication yes\nX11Forwarding no\n"),
            },
            // Commented default uncommented
            Test {
                original: "Port 22\n#PubkeyAuthentication no\n",
                expected: Some("Port 22\nPubkeyAuthentication yes\n"),
            },
            Test {
                original: "#  PubkeyAuthentication yes\n",
                expected: Some("PubkeyAuthentication yes\n"),
            },
            // Inserted before the first Match block
            Test {
                original: "Port 22\nMatch User backup\n    PubkeyAuthentication no\n",
                expected: Some(
                    "Port 22\nPubkeyAuthentication yes\nMatch User backup\n    PubkeyAuthentication no\n",
                ),
            },
            // Appended
            Test {
                original: "Port 22",
                expected: Some("Port 22\nPubkeyAuthentication yes\n"),
            },
            Test {
                original: "",
                expected: Some("PubkeyAuthentication yes\n"),
            },
        ];

        for test in tests {
            let result = ensure_directive(test.original, "PubkeyAuthentication", "yes");
            assert_eq!(test.expected.map(String::from), result, "original: {:?}", test.original);
        }
    }

    #[test]
    fn test_ensure_directive_is_idempotent() {
        let once = ensure_directive(
            "#AuthorizedKeysFile .ssh/authorized_keys .ssh/authorized_keys2\n",
            "AuthorizedKeysFile",
            ".ssh/authorized_keys",
        )
        .unwrap();

        assert_eq!("AuthorizedKeysFile .ssh/authorized_keys\n", once);
        assert_eq!(
            None,
            ensure_directive(&once, "AuthorizedKeysFile", ".ssh/authorized_keys"),
        );
    }
}
