//! Project root discovery
//!
//! Walks upward from a starting directory until a directory containing the
//! marker file is found. The walk never climbs above the user's home directory.

use std::path::{Path, PathBuf};

/// Marker file identifying a project root
pub const PROJECT_MARKER: &str = "Cargo.toml";

/// Find the project root starting from the current working directory
pub fn find_project_root() -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(find_project_root_from(
        &cwd,
        PROJECT_MARKER,
        dirs::home_dir().as_deref(),
    ))
}

/// Find the project root starting from `start`
///
/// Returns the first ancestor (including `start`) containing `marker`. When the
/// walk reaches `stop_at` without finding it, `stop_at` is the root. When it
/// runs out of ancestors (no home directory on the path), `start` is returned.
pub fn find_project_root_from(start: &Path, marker: &str, stop_at: Option<&Path>) -> PathBuf {
    let mut dir = start;
    loop {
        if dir.join(marker).exists() {
            return dir.to_path_buf();
        }
        if stop_at == Some(dir) {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return start.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_marker_in_start_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PROJECT_MARKER), "").unwrap();

        let root = find_project_root_from(temp_dir.path(), PROJECT_MARKER, None);
        assert_eq!(root, temp_dir.path());
    }

    #[test]
    fn test_marker_in_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PROJECT_MARKER), "").unwrap();
        let nested = temp_dir.path().join("src").join("bin");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root_from(&nested, PROJECT_MARKER, None);
        assert_eq!(root, temp_dir.path());
    }

    #[test]
    fn test_stops_at_home() {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("home");
        let nested = home.join("code").join("scratch");
        fs::create_dir_all(&nested).unwrap();
        // A marker above "home" must not be found
        fs::write(temp_dir.path().join(PROJECT_MARKER), "").unwrap();

        let root = find_project_root_from(&nested, PROJECT_MARKER, Some(&home));
        assert_eq!(root, home);
    }

    #[test]
    fn test_no_marker_and_no_home_returns_start() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root_from(&nested, "no-such-marker.file", None);
        assert_eq!(root, nested);
    }
}
