//! Builder for the git invocations a fetch needs
//!
//! Every git process goes through [`GitCommand`] so that timeouts, logging and
//! the mapping of a failed exit status onto [`ScaffoldError::GitCommandError`]
//! are handled in one place.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::git_command;
use crate::constants::GIT_CLONE_TIMEOUT;
use crate::core::ScaffoldError;

/// Builder for one git process.
///
/// # Examples
///
/// ```rust,no_run
/// use tgscaffold_cli::git::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = GitCommand::new()
///     .args(["rev-parse", "HEAD"])
///     .current_dir("/path/to/repo")
///     .execute()
///     .await?;
/// println!("{}", output.stdout.trim());
/// # Ok(())
/// # }
/// ```
///
/// New commands capture output, inherit the environment plus
/// `GIT_TERMINAL_PROMPT=0` and time out after five minutes.
pub struct GitCommand {
    /// Arguments after the optional `-C <dir>`
    args: Vec<String>,

    /// Directory passed with `-C`
    current_dir: Option<PathBuf>,

    /// Extra environment for the child process
    env_vars: Vec<(String, String)>,

    /// `None` waits forever
    timeout_duration: Option<Duration>,

    /// Label prefixed to log lines
    context: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            // Credential prompts would hang a non-interactive run
            env_vars: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout_duration: Some(Duration::from_secs(300)),
            context: None,
        }
    }
}

impl GitCommand {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git with `-C dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label log lines of this invocation, e.g. with the locator being fetched.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// `git clone --depth 1 [--branch <reference>] <url> <target>`
    pub fn clone_shallow(url: &str, reference: Option<&str>, target: &Path) -> Self {
        let mut cmd = Self::new().args(["clone", "--depth", "1", "--quiet"]);
        if let Some(reference) = reference {
            cmd = cmd.args(["--branch", reference]);
        }
        cmd.arg(url)
            .arg(target.display().to_string())
            .with_timeout(Some(GIT_CLONE_TIMEOUT))
    }

    /// `git clone <url> <target>` with full history.
    pub fn clone_full(url: &str, target: &Path) -> Self {
        Self::new()
            .args(["clone", "--quiet"])
            .arg(url)
            .arg(target.display().to_string())
            .with_timeout(Some(GIT_CLONE_TIMEOUT))
    }

    /// `git -C <repo> checkout --quiet <reference>`
    pub fn checkout(repo: &Path, reference: &str) -> Self {
        Self::new().current_dir(repo).args(["checkout", "--quiet", reference])
    }

    /// Execute the command and return the output
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let git = git_command();
        let mut cmd = Command::new(git);

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        let operation = self.args.first().cloned().unwrap_or_else(|| "unknown".to_string());

        cmd.args(&full_args);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match &self.context {
            Some(ctx) => tracing::debug!(
                target: "git",
                "({}) Executing command: {} {}",
                ctx,
                git,
                full_args.join(" ")
            ),
            None => tracing::debug!(target: "git", "Executing command: {} {}", git, full_args.join(" ")),
        }

        let output_future = cmd.output();
        let output = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?,
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(ScaffoldError::GitCommandError {
                        operation,
                        stderr: format!(
                            "Git command timed out after {} seconds. Check network access and \
                             credentials, or run it manually: git {}",
                            duration.as_secs(),
                            full_args.join(" ")
                        ),
                    }
                    .into());
                }
            },
            None => output_future
                .await
                .with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            return Err(ScaffoldError::GitCommandError {
                operation,
                stderr: if stderr.trim().is_empty() { stdout } else { stderr },
            }
            .into());
        }

        if !stderr.trim().is_empty() {
            tracing::trace!(target: "git", "{}", stderr.trim());
        }

        Ok(GitCommandOutput { stdout, stderr })
    }

    /// Execute the command, discarding its output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}

/// Captured output of a successful git invocation.
#[derive(Debug, Clone)]
pub struct GitCommandOutput {
    pub stdout: String,
    pub stderr: String,
}
