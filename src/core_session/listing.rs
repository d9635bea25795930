use crate::constants::{DIR_TAG, ROOT_DIRECTORY};
use crate::core_ftp::RemoteEntry;

/// One row of the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// Synthetic first row, used to navigate up.
    Root,
    Remote(RemoteEntry),
}

impl ListingEntry {
    pub fn display(&self) -> String {
        match self {
            ListingEntry::Root => ROOT_DIRECTORY.to_string(),
            ListingEntry::Remote(entry) if entry.is_directory => {
                format!("{}{}", DIR_TAG, entry.name)
            }
            ListingEntry::Remote(entry) => entry.name.clone(),
        }
    }
}

/// What a click on a listing row asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Parent,
    Directory(String),
    File(String),
}

/// Ordered listing of the current remote directory. Rebuilt wholesale after
/// every navigation or mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    entries: Vec<ListingEntry>,
}

impl DirectoryListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(raw_entries: &[RemoteEntry]) -> Self {
        let mut listing = Self::new();
        listing.populate(raw_entries);
        listing
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the content with the root marker followed by `raw_entries` in
    /// server order, without `.` and `..`.
    pub fn populate(&mut self, raw_entries: &[RemoteEntry]) {
        self.entries.clear();
        self.entries.push(ListingEntry::Root);
        self.entries.extend(
            raw_entries
                .iter()
                .filter(|entry| !entry.is_navigation_alias())
                .cloned()
                .map(ListingEntry::Remote),
        );
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn display_lines(&self) -> Vec<String> {
        self.entries.iter().map(ListingEntry::display).collect()
    }

    pub fn select(&self, index: usize) -> Option<Selection> {
        match self.entries.get(index)? {
            ListingEntry::Root => Some(Selection::Parent),
            ListingEntry::Remote(entry) if entry.is_directory => {
                Some(Selection::Directory(entry.name.clone()))
            }
            ListingEntry::Remote(entry) => Some(Selection::File(entry.name.clone())),
        }
    }

    /// Finds a remote entry by its bare name.
    pub fn find(&self, name: &str) -> Option<&RemoteEntry> {
        self.entries.iter().find_map(|entry| match entry {
            ListingEntry::Remote(remote) if remote.name == name => Some(remote),
            _ => None,
        })
    }
}

/// Recovers the remote name from a display string. Only the full tag,
/// space included, marks a directory.
pub fn resolve_selection(display: &str) -> String {
    let display = display.trim_start();
    display
        .strip_prefix(DIR_TAG)
        .unwrap_or(display)
        .trim()
        .to_string()
}

pub fn is_directory_entry(display: &str) -> bool {
    display.trim_start().starts_with(DIR_TAG)
}
