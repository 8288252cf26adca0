//! Writing and removing the `pre-commit` script that invokes the gate.

use std::path::{Path, PathBuf};

use crate::repo::Repository;

/// Line that identifies a hook script as ours.
pub const MARKER: &str = "# managed by commit-gate";

/// Error installing or removing the hook script.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InstallError {
    #[error("a pre-commit hook already exists at {0}")]
    #[diagnostic(
        code(commit_gate::install::exists),
        help("pass --force to replace it, or merge it into your gate config by hand")
    )]
    Exists(PathBuf),
    #[error("the pre-commit hook at {0} was not installed by commit-gate")]
    #[diagnostic(
        code(commit_gate::install::foreign),
        help("it was left in place; delete it by hand if it is no longer needed")
    )]
    Foreign(PathBuf),
    #[error("failed to access {path}: {source}")]
    #[diagnostic(
        code(commit_gate::install::io),
        help("check the permissions of the repository's hooks directory")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(PathBuf),
    /// An existing hook was overwritten.
    Replaced(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Removed(PathBuf),
    NotInstalled(PathBuf),
}

/// What the installed script should run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Program the hook execs; an absolute path keeps the hook working when
    /// the binary is not on `PATH`.
    pub program: String,
    /// Config path baked into the hook, if any.
    pub config: Option<PathBuf>,
    /// Overwrite a hook that commit-gate did not write.
    pub force: bool,
}

/// Render the hook script.
pub fn hook_script(program: &str, config: Option<&Path>) -> String {
    let mut command = format!("exec {} run", shell_quote(program));
    if let Some(config) = config {
        command.push_str(" --config ");
        command.push_str(&shell_quote(&config.to_string_lossy()));
    }
    format!("#!/bin/sh\n{MARKER}\n# Remove with `commit-gate uninstall`.\n{command}\n")
}

/// Write the pre-commit hook for `repo`.
///
/// An existing hook carrying [`MARKER`] is replaced silently; any other
/// existing hook is only replaced with `force`.
pub fn install(repo: &Repository, options: &InstallOptions) -> Result<InstallOutcome, InstallError> {
    let hooks_dir = repo.hooks_dir();
    std::fs::create_dir_all(&hooks_dir).map_err(|source| InstallError::Io {
        path: hooks_dir.clone(),
        source,
    })?;

    let path = repo.pre_commit_hook();
    let existing = read_existing(&path)?;
    if let Some(content) = &existing {
        if !is_managed(content) && !options.force {
            return Err(InstallError::Exists(path));
        }
    }

    let script = hook_script(&options.program, options.config.as_deref());
    std::fs::write(&path, script).map_err(|source| InstallError::Io {
        path: path.clone(),
        source,
    })?;
    make_executable(&path)?;
    tracing::info!(path = %path.display(), "pre-commit hook written");

    Ok(match existing {
        Some(_) => InstallOutcome::Replaced(path),
        None => InstallOutcome::Installed(path),
    })
}

/// Remove the pre-commit hook if commit-gate wrote it.
pub fn uninstall(repo: &Repository) -> Result<UninstallOutcome, InstallError> {
    let path = repo.pre_commit_hook();
    match read_existing(&path)? {
        None => Ok(UninstallOutcome::NotInstalled(path)),
        Some(content) if !is_managed(&content) => Err(InstallError::Foreign(path)),
        Some(_) => {
            std::fs::remove_file(&path).map_err(|source| InstallError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), "pre-commit hook removed");
            Ok(UninstallOutcome::Removed(path))
        }
    }
}

fn is_managed(content: &str) -> bool {
    content.lines().any(|line| line.trim() == MARKER)
}

fn read_existing(path: &Path) -> Result<Option<String>, InstallError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(InstallError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        InstallError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

/// Single-quote a word for POSIX sh. Embedded `'` becomes `'\''`.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_in(dir: &Path) -> Repository {
        std::fs::create_dir_all(dir.join(".git")).unwrap();
        Repository::discover(dir).unwrap()
    }

    fn options(force: bool) -> InstallOptions {
        InstallOptions {
            program: "/usr/local/bin/commit-gate".to_string(),
            config: None,
            force,
        }
    }

    #[test]
    fn script_execs_the_gate() {
        let script = hook_script("/usr/local/bin/commit-gate", None);
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(MARKER));
        assert!(script.ends_with("exec '/usr/local/bin/commit-gate' run\n"));
    }

    #[test]
    fn script_includes_config_path() {
        let script = hook_script("commit-gate", Some(Path::new("ci/gate.kdl")));
        assert!(script.contains("exec 'commit-gate' run --config 'ci/gate.kdl'"));
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn install_creates_hooks_dir_and_script() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());

        let outcome = install(&repo, &options(false)).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed(repo.pre_commit_hook()));
        let content = std::fs::read_to_string(repo.pre_commit_hook()).unwrap();
        assert!(content.contains(MARKER));
    }

    #[cfg(unix)]
    #[test]
    fn installed_hook_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        install(&repo, &options(false)).unwrap();

        let mode = std::fs::metadata(repo.pre_commit_hook())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn install_from_worktree_writes_shared_hook() {
        let dir = tempfile::tempdir().unwrap();
        let main_git = dir.path().join("main/.git");
        let git_dir = main_git.join("worktrees/wt");
        std::fs::create_dir_all(&git_dir).unwrap();
        std::fs::write(git_dir.join("commondir"), "../..\n").unwrap();
        let worktree = dir.path().join("wt");
        std::fs::create_dir_all(&worktree).unwrap();
        std::fs::write(worktree.join(".git"), format!("gitdir: {}\n", git_dir.display())).unwrap();
        let repo = Repository::discover(&worktree).unwrap();

        install(&repo, &options(false)).unwrap();
        let content = std::fs::read_to_string(main_git.join("hooks/pre-commit")).unwrap();
        assert!(content.contains(MARKER));
        assert!(!git_dir.join("hooks/pre-commit").exists());
    }

    #[test]
    fn reinstall_over_own_hook_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        install(&repo, &options(false)).unwrap();

        let outcome = install(&repo, &options(false)).unwrap();
        assert_eq!(outcome, InstallOutcome::Replaced(repo.pre_commit_hook()));
    }

    #[test]
    fn foreign_hook_is_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        std::fs::create_dir_all(repo.hooks_dir()).unwrap();
        std::fs::write(repo.pre_commit_hook(), "#!/bin/sh\nnpm test\n").unwrap();

        let err = install(&repo, &options(false)).unwrap_err();
        assert!(matches!(err, InstallError::Exists(_)));
        let content = std::fs::read_to_string(repo.pre_commit_hook()).unwrap();
        assert_eq!(content, "#!/bin/sh\nnpm test\n");
    }

    #[test]
    fn force_replaces_foreign_hook() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        std::fs::create_dir_all(repo.hooks_dir()).unwrap();
        std::fs::write(repo.pre_commit_hook(), "#!/bin/sh\nnpm test\n").unwrap();

        let outcome = install(&repo, &options(true)).unwrap();
        assert_eq!(outcome, InstallOutcome::Replaced(repo.pre_commit_hook()));
        let content = std::fs::read_to_string(repo.pre_commit_hook()).unwrap();
        assert!(content.contains(MARKER));
    }

    #[test]
    fn uninstall_removes_own_hook() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        install(&repo, &options(false)).unwrap();

        let outcome = uninstall(&repo).unwrap();
        assert_eq!(outcome, UninstallOutcome::Removed(repo.pre_commit_hook()));
        assert!(!repo.pre_commit_hook().exists());
    }

    #[test]
    fn uninstall_without_hook_reports_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());

        let outcome = uninstall(&repo).unwrap();
        assert_eq!(outcome, UninstallOutcome::NotInstalled(repo.pre_commit_hook()));
    }

    #[test]
    fn uninstall_refuses_foreign_hook() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(dir.path());
        std::fs::create_dir_all(repo.hooks_dir()).unwrap();
        std::fs::write(repo.pre_commit_hook(), "#!/bin/sh\nmake check\n").unwrap();

        assert!(matches!(
            uninstall(&repo).unwrap_err(),
            InstallError::Foreign(_)
        ));
        assert!(repo.pre_commit_hook().exists());
    }
}
