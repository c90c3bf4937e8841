use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::repo_ref::redact_url;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

const CHECKOUT_DIR_NAME: &str = "checkout";
const TEMP_DIR_PREFIX: &str = "repodoc-";
const GIT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport credentials used for the clone only
#[derive(Clone, Default)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    /// Extra `Name: value` headers
    pub headers: Vec<(String, String)>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            headers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none() && self.headers.is_empty()
    }

    fn http_headers(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.headers.len() + 1);
        if let Some(token) = self.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            out.push(format!("Authorization: Bearer {token}"));
        }
        out.extend(
            self.headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}")),
        );
        out
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Credentials")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "***"))
            .field("headers", &names)
            .finish()
    }
}

/// A shallow clone in a private temporary directory, removed on drop
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    checkout: PathBuf,
    branch: String,
    commit: String,
}

impl Workspace {
    /// Clone the default branch (depth 1) and pin it to its head commit.
    ///
    /// The temporary directory is owned by the returned guard; on any error it
    /// has already been removed when this returns.
    pub async fn acquire(
        url: &str,
        credentials: &Credentials,
        config: &IngestConfig,
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);
        let dir = match &config.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let checkout = dir.path().join(CHECKOUT_DIR_NAME);
        let mut workspace = Self {
            dir: Some(dir),
            checkout,
            branch: String::new(),
            commit: String::new(),
        };

        let redacted = redact_url(url);
        log::info!("Cloning {redacted}");
        clone_shallow(url, &workspace.checkout, credentials, config.clone_timeout())
            .await
            .map_err(|message| IngestError::fetch(&redacted, message))?;

        workspace.branch = git_stdout(&workspace.checkout, &["symbolic-ref", "--short", "HEAD"])
            .await
            .map_err(|e| IngestError::branch(format!("default branch: {e}")))?;
        workspace.commit = git_stdout(
            &workspace.checkout,
            &["rev-parse", "--verify", "--quiet", "HEAD^{commit}"],
        )
        .await
        .map_err(|e| {
            IngestError::branch(format!(
                "head of '{}' does not name a commit: {e}",
                workspace.branch
            ))
        })?;

        log::info!(
            "Checked out {redacted} at {} ({})",
            workspace.branch,
            workspace.commit
        );
        Ok(workspace)
    }

    /// Root of the checked-out working tree
    pub fn path(&self) -> &Path {
        &self.checkout
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// Remove the workspace now instead of at drop
    pub fn close(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => log::debug!("Removed workspace {}", path.display()),
            Err(e) => log::warn!("Failed to remove workspace {}: {e}", path.display()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}

async fn clone_shallow(
    url: &str,
    dest: &Path,
    credentials: &Credentials,
    limit: Duration,
) -> std::result::Result<(), String> {
    let mut cmd = Command::new("git");
    // `-c` scopes the headers to this invocation; nothing is written to the clone's config.
    for header in credentials.http_headers() {
        cmd.arg("-c").arg(format!("http.extraHeader={header}"));
    }
    cmd.arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--single-branch")
        .arg("--no-tags")
        .arg("--quiet")
        .arg("--")
        .arg(url)
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = timeout(limit, cmd.output())
        .await
        .map_err(|_| format!("clone timed out after {}s", limit.as_secs()))?
        .map_err(|e| format!("failed to run git: {e}"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(redact_url_in_line)
        .collect::<Vec<_>>()
        .join("; ");
    Err(if message.is_empty() {
        format!("git clone exited with {}", output.status)
    } else {
        message
    })
}

/// Redact every URL-looking token of a git diagnostic line
fn redact_url_in_line(line: &str) -> String {
    line.split(' ')
        .map(|token| {
            let (quote, inner) = match token.strip_prefix('\'') {
                Some(rest) => ("'", rest),
                None => ("", token),
            };
            if inner.contains("://") {
                format!("{quote}{}", redact_url(inner))
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn git_stdout(repo: &Path, args: &[&str]) -> std::result::Result<String, String> {
    let output = timeout(
        GIT_RESOLVE_TIMEOUT,
        Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| format!("git {} timed out", args.join(" ")))?
    .map_err(|e| format!("failed to run git: {e}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || stdout.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(if stderr.is_empty() {
            format!("git {} exited with {}", args.join(" "), output.status)
        } else {
            stderr
        });
    }
    Ok(stdout)
}
