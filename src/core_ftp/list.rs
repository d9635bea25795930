use log::{debug, error};
use regex::Regex;
use std::sync::OnceLock;

/// One file or directory as reported by a `LIST` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: Option<u64>,
}

impl RemoteEntry {
    #[cfg(test)]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size: None,
        }
    }

    #[cfg(test)]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size: None,
        }
    }

    /// `.` and `..` are never shown to the user.
    pub fn is_navigation_alias(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// Compiled once; `None` only if the pattern itself is invalid.
fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            error!("Invalid listing pattern: {}", e);
            None
        }
    })
    .as_ref()
}

fn unix_regex() -> Option<&'static Regex> {
    static UNIX: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &UNIX,
        r"^([\-dlcbpsD])[rwxsStTl\-]{9}\S*\s+\d+\s+\S+(?:\s+\S+)?\s+(\d+)\s+\w{3}\s+\d{1,2}\s+(?:\d{1,2}:\d{2}|\d{4})\s(.+)$",
    )
}

fn dos_regex() -> Option<&'static Regex> {
    static DOS: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &DOS,
        r"^\d{2}-\d{2}-\d{2,4}\s+\d{1,2}:\d{2}\s*[AaPp][Mm]\s+(<DIR>|\d+)\s+(.+)$",
    )
}

/// Parses one line of `LIST` output. Returns `None` for lines that describe no
/// entry (`total 12`, blank lines, formats we do not understand).
pub fn parse_list_line(line: &str) -> Option<RemoteEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    if let Some(captures) = unix_regex().and_then(|regex| regex.captures(line)) {
        let kind = &captures[1];
        let mut name = captures[3].trim_start().to_string();
        if kind == "l" {
            if let Some(index) = name.find(" -> ") {
                name.truncate(index);
            }
        }
        return Some(RemoteEntry {
            name,
            is_directory: kind == "d" || kind == "D",
            size: captures[2].parse().ok(),
        });
    }

    if let Some(captures) = dos_regex().and_then(|regex| regex.captures(line)) {
        let is_directory = &captures[1] == "<DIR>";
        return Some(RemoteEntry {
            name: captures[2].to_string(),
            is_directory,
            size: if is_directory {
                None
            } else {
                captures[1].parse().ok()
            },
        });
    }

    debug!("Skipping unrecognised listing line: {}", line);
    None
}

/// Parses the full body received on the data connection.
pub fn parse_listing(body: &str) -> Vec<RemoteEntry> {
    body.lines().filter_map(parse_list_line).collect()
}
