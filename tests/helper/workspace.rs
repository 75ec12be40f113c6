//! Temporary workflow directories

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gha_pin_updater::config::UpdaterConfig;

pub const OLD_HASH: &str = "1111111111111111111111111111111111111111";
pub const NEW_HASH: &str = "2222222222222222222222222222222222222222";
pub const OTHER_HASH: &str = "3333333333333333333333333333333333333333";

/// Create a temp directory holding `files` (relative path, content)
pub fn create_workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}

/// Config pointing at `root` with every optional behavior off
pub fn create_config(root: &Path) -> UpdaterConfig {
    UpdaterConfig {
        path: root.to_path_buf(),
        ..Default::default()
    }
}

pub fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative)).unwrap()
}

/// Sorted relative paths of every file under `root`
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    fn visit(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }

    let mut files = Vec::new();
    visit(root, root, &mut files);
    files.sort();
    files
}
