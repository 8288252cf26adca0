use std::path::{Path, PathBuf};

/// Error locating the enclosing repository.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not inside a git repository (searched upward from {0})")]
    NotFound(PathBuf),
    #[error("malformed .git file at {0}: expected 'gitdir: <path>'")]
    BadGitFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A located repository: its working tree root and its git directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub root: PathBuf,
    pub git_dir: PathBuf,
    /// Directory shared by all worktrees; holds `hooks/`. Equal to
    /// `git_dir` outside linked worktrees.
    pub common_dir: PathBuf,
}

impl Repository {
    /// Walk upward from `start` to the first directory containing `.git`.
    ///
    /// `.git` may be a directory or, for worktrees and submodules, a file
    /// holding `gitdir: <path>` (relative paths resolve against the file's
    /// directory). A linked worktree's git dir names the shared repository
    /// in its `commondir` file, and hooks are read from there.
    pub fn discover(start: &Path) -> Result<Self, RepoError> {
        for dir in start.ancestors() {
            let dot_git = dir.join(".git");
            if dot_git.is_dir() {
                return Ok(Repository {
                    root: dir.to_path_buf(),
                    common_dir: dot_git.clone(),
                    git_dir: dot_git,
                });
            }
            if dot_git.is_file() {
                let git_dir = dir.join(read_git_file(&dot_git)?);
                let common_dir = read_common_dir(&git_dir)?;
                return Ok(Repository {
                    root: dir.to_path_buf(),
                    git_dir,
                    common_dir,
                });
            }
        }
        Err(RepoError::NotFound(start.to_path_buf()))
    }

    /// Directory the VCS looks in for hook scripts.
    pub fn hooks_dir(&self) -> PathBuf {
        self.common_dir.join("hooks")
    }

    /// Path of the pre-commit hook script.
    pub fn pre_commit_hook(&self) -> PathBuf {
        self.hooks_dir().join("pre-commit")
    }
}

fn read_git_file(path: &Path) -> Result<PathBuf, RepoError> {
    let content = std::fs::read_to_string(path).map_err(|source| RepoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))
        .map(|target| PathBuf::from(target.trim()))
        .filter(|target| !target.as_os_str().is_empty())
        .ok_or_else(|| RepoError::BadGitFile(path.to_path_buf()))
}

/// Resolve `<git_dir>/commondir`, falling back to `git_dir` when absent.
fn read_common_dir(git_dir: &Path) -> Result<PathBuf, RepoError> {
    let path = git_dir.join("commondir");
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let target = content.trim();
            if target.is_empty() {
                Ok(git_dir.to_path_buf())
            } else {
                Ok(git_dir.join(target))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(git_dir.to_path_buf()),
        Err(source) => Err(RepoError::Io { path, source }),
    }
}
