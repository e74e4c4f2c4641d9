//! Mirror repository lifecycle.
//!
//! Per addon, per run:
//!
//! 1. [`RepositoryGateway::reset`] — delete the working copy, clone afresh.
//! 2. [`RepositoryGateway::current_version`] — most recent reachable tag, or
//!    `""` when the repository has never been mirrored.
//! 3. (caller compares against the upstream version)
//! 4. [`RepositoryGateway::commit_and_push`] — stage `release.json`, commit
//!    (empty allowed), tag, push branch, push tags.
//!
//! [`GitGateway`] shells out to the system `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use mirror_core::Slug;
use mirror_renderer::RELEASE_JSON;

use crate::error::{io_err, SyncError};

/// `git describe` diagnostics that mean "no tags yet" rather than a broken repo.
const NO_TAG_MARKERS: &[&str] = &[
    "No names found, cannot describe anything",
    "No tags can describe",
];

/// Git lifecycle operations for one addon's mirror repository.
pub trait RepositoryGateway {
    /// Destroy any local copy of `slug` and clone it fresh. Returns the
    /// working-copy path.
    fn reset(&self, slug: &Slug) -> Result<PathBuf, SyncError>;

    /// Most recent tag reachable from the tip, `""` if there is none.
    fn current_version(&self, repo: &Path) -> Result<String, SyncError>;

    /// Commit `release.json`, tag the commit `version`, push branch then tags.
    fn commit_and_push(&self, repo: &Path, version: &str) -> Result<(), SyncError>;
}

/// [`RepositoryGateway`] over the `git` CLI.
///
/// Working copies live at `<repos_dir>/<slug>`; remotes at `<remote_base>/<slug>`.
#[derive(Debug, Clone)]
pub struct GitGateway {
    repos_dir: PathBuf,
    remote_base: String,
    identity: Option<(String, String)>,
}

impl GitGateway {
    pub fn new(repos_dir: impl Into<PathBuf>, remote_base: impl Into<String>) -> Self {
        Self {
            repos_dir: repos_dir.into(),
            remote_base: remote_base.into().trim_end_matches('/').to_string(),
            identity: None,
        }
    }

    /// Commit as `name <email>` instead of whatever the ambient git config says.
    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.identity = Some((name.into(), email.into()));
        self
    }

    pub fn repo_path(&self, slug: &Slug) -> PathBuf {
        self.repos_dir.join(&slug.0)
    }

    pub fn remote_url(&self, slug: &Slug) -> String {
        format!("{}/{}", self.remote_base, slug)
    }

    fn git(&self, dir: &Path, args: &[&str]) -> std::io::Result<Output> {
        let mut cmd = Command::new("git");
        if let Some((name, email)) = &self.identity {
            cmd.arg("-c")
                .arg(format!("user.name={name}"))
                .arg("-c")
                .arg(format!("user.email={email}"));
        }
        cmd.args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(dir = %dir.display(), "executing git {}", args.join(" "));
        cmd.output()
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

impl RepositoryGateway for GitGateway {
    fn reset(&self, slug: &Slug) -> Result<PathBuf, SyncError> {
        slug.validate()?;
        let path = self.repo_path(slug);
        if path.exists() {
            std::fs::remove_dir_all(&path).map_err(|e| io_err(&path, e))?;
        }
        std::fs::create_dir_all(&self.repos_dir).map_err(|e| io_err(&self.repos_dir, e))?;

        let url = self.remote_url(slug);
        let dest = path.to_string_lossy();
        let unavailable = |reason: String| {
            let _ = std::fs::remove_dir_all(&path);
            SyncError::RepoUnavailable {
                slug: slug.0.clone(),
                reason,
            }
        };

        let output = self
            .git(&self.repos_dir, &["clone", url.as_str(), &*dest])
            .map_err(|e| unavailable(format!("failed to spawn git clone: {e}")))?;
        if !output.status.success() {
            return Err(unavailable(format!(
                "git clone {url} failed (status {}): {}",
                output.status,
                stderr_of(&output)
            )));
        }

        tracing::debug!(%slug, path = %path.display(), "cloned mirror repository");
        Ok(path)
    }

    fn current_version(&self, repo: &Path) -> Result<String, SyncError> {
        let state_err = |reason: String| SyncError::RepoStateError {
            path: repo.to_path_buf(),
            reason,
        };

        let git_dir = self
            .git(repo, &["rev-parse", "--git-dir"])
            .map_err(|e| state_err(format!("failed to spawn git rev-parse: {e}")))?;
        if !git_dir.status.success() {
            return Err(state_err(format!("not a git repository: {}", stderr_of(&git_dir))));
        }

        // A freshly created remote has no commits at all; that is "never mirrored".
        let head = self
            .git(repo, &["rev-parse", "--verify", "--quiet", "HEAD"])
            .map_err(|e| state_err(format!("failed to spawn git rev-parse: {e}")))?;
        if !head.status.success() {
            return Ok(String::new());
        }

        let output = self
            .git(repo, &["describe", "--tags", "--abbrev=0"])
            .map_err(|e| state_err(format!("failed to spawn git describe: {e}")))?;
        if output.status.success() {
            return Ok(stdout_of(&output));
        }

        let stderr = stderr_of(&output);
        if NO_TAG_MARKERS.iter().any(|m| stderr.contains(m)) {
            return Ok(String::new());
        }
        Err(state_err(format!("git describe failed: {stderr}")))
    }

    fn commit_and_push(&self, repo: &Path, version: &str) -> Result<(), SyncError> {
        // Working copies are named after their slug.
        let slug = repo
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let steps: [(&str, &[&str]); 5] = [
            ("add", &["add", "--", RELEASE_JSON]),
            ("commit", &["commit", "--allow-empty", "-m", version]),
            ("tag", &["tag", version]),
            ("push", &["push", "origin", "HEAD"]),
            ("push tags", &["push", "origin", "--tags"]),
        ];

        for (step, args) in steps {
            let output = self.git(repo, args).map_err(|e| SyncError::RepoPublishFailed {
                slug: slug.clone(),
                step: step.to_string(),
                reason: format!("failed to spawn git: {e}"),
            })?;
            if !output.status.success() {
                return Err(SyncError::RepoPublishFailed {
                    slug: slug.clone(),
                    step: step.to_string(),
                    reason: format!(
                        "git {} failed (status {}): {}",
                        args.join(" "),
                        output.status,
                        stderr_of(&output)
                    ),
                });
            }
        }

        tracing::info!(repo = %repo.display(), %version, "tagged and pushed");
        Ok(())
    }
}
