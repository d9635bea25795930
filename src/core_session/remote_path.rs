use crate::constants::ROOT_DIRECTORY;

/// Joins `name` onto the remote directory `dir` with exactly one separator.
pub fn join_remote(dir: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Parent of an absolute remote path. The parent of the root is the root.
#[cfg(test)]
pub fn parent_remote(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => ROOT_DIRECTORY.to_string(),
        Some(index) => trimmed[..index].to_string(),
    }
}

pub fn is_root(path: &str) -> bool {
    path == ROOT_DIRECTORY
}
