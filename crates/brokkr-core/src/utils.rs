//! Shared utility functions for Brokkr crates

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Runtime used to execute package entry files (command and custom-template
/// packages declare a JS `main`)
pub const ENTRY_RUNTIME: &str = "node";

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() because:
/// - In containers with volume mounts, HOME may point at an alternate home
/// - dirs::home_dir() reads from /etc/passwd which doesn't respect env overrides
/// - Shell scripts use $HOME, so we need consistency with install scripts
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or(Error::HomeDirUnavailable)
}

/// Build a command for a host program, going through `cmd /c` on Windows so
/// that `.cmd`/`.bat` shims (npm, yarn) resolve the same way a shell would.
pub fn host_command(program: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/c").arg(program);
        cmd
    } else {
        Command::new(program)
    }
}

/// Recursively copy `src` into `dst`, creating both sides if absent.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Remove every entry inside `dir`, keeping the directory itself.
pub fn clear_dir(dir: &Path) -> Result<()> {
    debug!("clearing contents of {}", dir.display());
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_dir_is_resolvable() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    fn copies_nested_trees() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("a/b")).unwrap();
        std::fs::write(src.path().join("a/b/file.txt"), "hi").unwrap();
        std::fs::write(src.path().join("root.txt"), "top").unwrap();

        let target = dst.path().join("out");
        copy_dir_all(src.path(), &target).unwrap();

        assert_eq!(
            std::fs::read_to_string(target.join("a/b/file.txt")).unwrap(),
            "hi"
        );
        assert_eq!(std::fs::read_to_string(target.join("root.txt")).unwrap(), "top");
    }

    #[test]
    fn clears_contents_but_keeps_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested/deep")).unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        clear_dir(dir.path()).unwrap();

        assert!(dir.path().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
