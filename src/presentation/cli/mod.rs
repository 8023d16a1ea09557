use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use validator::Validate;

use crate::application::use_cases::locate_source_repo::{
    LocateOutcome, LocateSourceRepoConfig, LocateSourceRepoUseCase,
};
use crate::common::error::SdRepoError;
use crate::common::logging;
use crate::common::result::{ResultExt, SdRepoResult};
use crate::domain::entities::tool_config::{ConfigOverrides, ToolConfig};
use crate::infrastructure::process::RepoTool;

/// Version string shown by `--version`
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// sd-repo - Locate a source repository inside a repo tool checkout
#[derive(Parser, Debug)]
#[command(name = "sd-repo")]
#[command(about = "Check out a repo manifest and record where the source repository lives")]
#[command(version = VERSION)]
pub struct Cli {
    /// Manifest repository URL, e.g. git@github.com:org/manifests.git/default.xml#branch
    #[arg(long = "manifestUrl", value_name = "URL")]
    pub manifest_url: String,

    /// Name of the source repository as listed in the manifest
    #[arg(long = "sourceRepo", value_name = "NAME")]
    pub source_repo: String,

    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the repo executable
    #[arg(long = "repo-bin", value_name = "PATH", env = "SD_REPO_EXECUTABLE")]
    pub repo_bin: Option<String>,

    /// Number of parallel jobs for repo sync
    #[arg(short, long, value_name = "N", env = "SD_REPO_SYNC_JOBS")]
    pub jobs: Option<usize>,

    /// File that receives the source repository path
    #[arg(short, long, value_name = "FILE", env = "SD_REPO_OUTPUT_FILE")]
    pub output: Option<String>,

    /// Checkout directory (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Values given on the command line or through the environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repo_executable: self.repo_bin.clone(),
            sync_jobs: self.jobs,
            output_file: self.output.clone(),
        }
    }

    /// Directory the checkout is created in
    pub fn checkout_root(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    /// Parse the process arguments, exiting with status 1 on invalid usage
    pub fn new() -> Self {
        match Cli::try_parse() {
            Ok(cli) => Self { cli },
            Err(e) => {
                // --help and --version are reported through the same path
                let code = if e.use_stderr() { 1 } else { 0 };
                if e.print().is_err() {
                    exit(1);
                }
                exit(code);
            }
        }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        logging::init(self.cli.verbose);

        match self.handle_locate().await {
            Ok(outcome) => {
                tracing::info!(
                    source_path = %outcome.source_path(),
                    output = %outcome.output_file.display(),
                    "source repository located"
                );
                Ok(())
            }
            Err(e) => {
                if let Some(stage) = e.workflow_stage() {
                    tracing::debug!(%stage, "workflow failed");
                }
                println!("{}", format_error(&e));
                exit(1);
            }
        }
    }

    async fn handle_locate(&self) -> SdRepoResult<LocateOutcome> {
        let config = self.load_config()?;
        let checkout_root = self.cli.checkout_root();

        tracing::debug!(
            checkout_root = %checkout_root.display(),
            repo = %config.repo_executable,
            jobs = config.sync_jobs,
            "starting"
        );

        let tool = RepoTool::with_executable(config.repo_executable.clone()).in_dir(&checkout_root);
        let use_case_config = LocateSourceRepoConfig::new(checkout_root)
            .with_output_file(&config.output_file)
            .with_sync_jobs(config.sync_jobs);

        let use_case = LocateSourceRepoUseCase::new(use_case_config, Arc::new(tool));
        let outcome = use_case
            .execute(&self.cli.manifest_url, &self.cli.source_repo)
            .await?;

        Ok(outcome)
    }

    /// Merge defaults, the YAML file and command line values, then validate
    fn load_config(&self) -> SdRepoResult<ToolConfig> {
        let base = match &self.cli.config {
            Some(path) => load_config_file(path)?,
            None => ToolConfig::default(),
        };

        let config = base.with_overrides(self.cli.overrides());
        config.validate()?;
        Ok(config)
    }
}

/// Read a YAML configuration file
pub fn load_config_file(path: &Path) -> SdRepoResult<ToolConfig> {
    let content = std::fs::read_to_string(path).with_filesystem_error(
        format!("Failed to read config file {}", path.display()),
        Some(path.to_path_buf()),
    )?;

    let config = ToolConfig::from_yaml_str(&content)
        .with_config_error(format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Workflow messages already carry their own `Error` prefix
fn format_error(error: &SdRepoError) -> String {
    let message = error.to_string();
    if message.starts_with("Error") {
        message
    } else {
        format!("{} {}", "Error:".red().bold(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::locate_source_repo::{WorkflowError, WorkflowStage};
    use crate::infrastructure::process::ToolError;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["sd-repo"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_required_flags() {
        let cli = parse(&[
            "--manifestUrl",
            "git@github.com:org/manifests.git",
            "--sourceRepo",
            "org/app",
        ]);
        assert_eq!(cli.manifest_url, "git@github.com:org/manifests.git");
        assert_eq!(cli.source_repo, "org/app");
        assert_eq!(cli.checkout_root(), PathBuf::from("."));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_required_flag() {
        let result = Cli::try_parse_from(["sd-repo", "--manifestUrl", "git@github.com:a/b.git"]);
        let error = result.unwrap_err();
        assert!(error.use_stderr());
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let error = Cli::try_parse_from(["sd-repo", "--help"]).unwrap_err();
        assert!(!error.use_stderr());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = parse(&[
            "--manifestUrl",
            "x",
            "--sourceRepo",
            "y",
            "--repo-bin",
            "/opt/repo",
            "--jobs",
            "12",
            "-C",
            "/work",
        ]);
        assert_eq!(
            cli.overrides(),
            ConfigOverrides {
                repo_executable: Some("/opt/repo".to_string()),
                sync_jobs: Some(12),
                output_file: None,
            }
        );
        assert_eq!(cli.checkout_root(), PathBuf::from("/work"));
    }

    #[test]
    fn test_load_config_file_and_flag_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "repo_executable: /usr/bin/repo\nsync_jobs: 2").unwrap();

        let cli = parse(&[
            "--manifestUrl",
            "x",
            "--sourceRepo",
            "y",
            "--config",
            file.path().to_str().unwrap(),
            "--jobs",
            "6",
        ]);
        let app = CliApp::from_cli(cli);
        let config = app.load_config().unwrap();

        assert_eq!(config.repo_executable, "/usr/bin/repo");
        assert_eq!(config.sync_jobs, 6);
        assert_eq!(config.output_file, "sourcePath");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cli = parse(&["--manifestUrl", "x", "--sourceRepo", "y", "--jobs", "0"]);
        let app = CliApp::from_cli(cli);
        let error = app.load_config().unwrap_err();
        assert!(error.to_string().starts_with("Validation error"));
    }

    #[test]
    fn test_missing_config_file() {
        let error = load_config_file(Path::new("/nonexistent/sd-repo.yaml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_format_error_keeps_existing_prefix() {
        colored::control::set_override(false);
        let error = SdRepoError::from(WorkflowError::SyncFailed(ToolError::command_failed(
            "repo sync -d -c --jobs=4",
            Some(1),
            "boom",
        )));
        assert!(format_error(&error).starts_with("Error executing 'repo sync': "));

        let error = SdRepoError::validation_error("config", "bad", None);
        assert_eq!(format_error(&error), "Error: Validation error: config - bad");
    }

    #[tokio::test]
    async fn test_workflow_failure_reports_stage() {
        let checkout = tempfile::TempDir::new().unwrap();
        let cli = parse(&[
            "--manifestUrl",
            "not-a-url",
            "--sourceRepo",
            "org/app",
            "--repo-bin",
            "/nonexistent/repo",
            "-C",
            checkout.path().to_str().unwrap(),
        ]);
        let app = CliApp::from_cli(cli);

        let error = app.handle_locate().await.unwrap_err();
        assert!(matches!(error, SdRepoError::Workflow(_)));
        assert_eq!(error.workflow_stage(), Some(WorkflowStage::ParsingUrl));
        assert_eq!(
            format_error(&error),
            "Error validating manifest URL: Not a valid git url not-a-url"
        );
    }
}
