//! Discovery of the `.dynform/` directory.
//!
//! The `.dynform/` directory holds a project's `config.yaml` and, by
//! convention, its field catalogs.

use std::path::{Path, PathBuf};

/// The name of the dynform metadata directory.
pub const PROJECT_DIR_NAME: &str = ".dynform";

/// The name of the config file inside [`PROJECT_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable that overrides the project directory.
const PROJECT_DIR_ENV: &str = "DYNFORM_DIR";

/// Walk up the directory tree from `start` looking for a `.dynform/` directory.
///
/// The `DYNFORM_DIR` environment variable is checked first. Returns `None`
/// if the filesystem root is reached without finding one.
pub fn find_project_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(PROJECT_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent;
            }
            _ => break,
        }
    }

    None
}

/// Path of the project config file, if a project directory with one exists
/// above `start`.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    find_project_dir(start)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
