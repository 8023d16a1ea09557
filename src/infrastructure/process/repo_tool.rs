use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Default executable name of the checkout tool
pub const DEFAULT_REPO_EXECUTABLE: &str = "repo";

/// Default number of parallel jobs passed to `sync`
pub const DEFAULT_SYNC_JOBS: usize = 4;

/// Errors that can occur while running the checkout tool
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {}: {output}", display_exit_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },
}

fn display_exit_code(exit_code: &Option<i32>) -> String {
    exit_code.map_or_else(|| "none".to_string(), |code| code.to_string())
}

impl ToolError {
    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            output: output.into(),
        }
    }

    /// Captured output of the failed command, if it ran at all
    pub fn output(&self) -> Option<&str> {
        match self {
            ToolError::Spawn { .. } => None,
            ToolError::CommandFailed { output, .. } => Some(output),
        }
    }
}

/// Combined output of a successful tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Command line that was run
    pub command: String,
    /// stdout followed by stderr
    pub output: String,
}

impl ToolOutput {
    pub fn new(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
        }
    }
}

/// Arguments for `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitRequest {
    /// Manifest repository URL (`-u`)
    pub url: String,
    /// Manifest branch (`-b`)
    pub branch: String,
    /// Manifest file inside the manifest repository (`-m`)
    pub manifest_name: String,
}

impl InitRequest {
    pub fn new(
        url: impl Into<String>,
        branch: impl Into<String>,
        manifest_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            manifest_name: manifest_name.into(),
        }
    }

    fn args(&self) -> Vec<String> {
        vec![
            "init".to_string(),
            "-u".to_string(),
            self.url.clone(),
            "-b".to_string(),
            self.branch.clone(),
            "-m".to_string(),
            self.manifest_name.clone(),
        ]
    }
}

/// Options for `sync`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Number of parallel jobs (`--jobs`)
    pub jobs: usize,
    /// Detach projects back to the manifest revision (`-d`)
    pub detach: bool,
    /// Fetch only the current branch (`-c`)
    pub current_branch_only: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_SYNC_JOBS,
            detach: true,
            current_branch_only: true,
        }
    }
}

impl SyncOptions {
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["sync".to_string()];
        if self.detach {
            args.push("-d".to_string());
        }
        if self.current_branch_only {
            args.push("-c".to_string());
        }
        args.push(format!("--jobs={}", self.jobs));
        args
    }
}

/// Operations of the multi-repository checkout tool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutTool: Send + Sync {
    /// Report the tool version (`repo version`)
    async fn version(&self) -> Result<ToolOutput, ToolError>;

    /// Initialize the checkout from a manifest repository (`repo init`)
    async fn init(&self, request: &InitRequest) -> Result<ToolOutput, ToolError>;

    /// Check out every project listed in the manifest (`repo sync`)
    async fn sync(&self, options: &SyncOptions) -> Result<ToolOutput, ToolError>;
}

/// `repo` command line implementation of [`CheckoutTool`]
pub struct RepoTool {
    executable: String,
    working_dir: Option<PathBuf>,
    echo_output: bool,
}

impl Default for RepoTool {
    fn default() -> Self {
        Self {
            executable: DEFAULT_REPO_EXECUTABLE.to_string(),
            working_dir: None,
            echo_output: true,
        }
    }
}

impl RepoTool {
    /// Create a new instance using `repo` from `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new instance with a custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Run every command inside `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Whether to print each command line and its captured output to stdout
    pub fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(self.executable.as_str());
        parts.extend(args.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Execute the tool and collect stdout followed by stderr
    async fn run(&self, args: &[String]) -> Result<ToolOutput, ToolError> {
        let command = self.command_line(args);
        tracing::info!(command = %command, "running checkout tool");
        if self.echo_output {
            println!("{}", command);
        }

        let mut cmd = Command::new(&self.executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| ToolError::Spawn {
            command: command.clone(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if self.echo_output && !combined.is_empty() {
            println!("{}", combined);
        }

        if !output.status.success() {
            tracing::debug!(command = %command, status = ?output.status.code(), "checkout tool failed");
            return Err(ToolError::command_failed(
                command,
                output.status.code(),
                combined,
            ));
        }

        Ok(ToolOutput::new(command, combined))
    }
}

#[async_trait]
impl CheckoutTool for RepoTool {
    async fn version(&self) -> Result<ToolOutput, ToolError> {
        self.run(&["version".to_string()]).await
    }

    async fn init(&self, request: &InitRequest) -> Result<ToolOutput, ToolError> {
        self.run(&request.args()).await
    }

    async fn sync(&self, options: &SyncOptions) -> Result<ToolOutput, ToolError> {
        self.run(&options.args()).await
    }
}
