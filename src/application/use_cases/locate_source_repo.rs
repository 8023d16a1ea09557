use crate::application::services::manifest_resolver::{ManifestResolveError, ManifestResolver};
use crate::domain::entities::manifest::Project;
use crate::domain::value_objects::git_url::{GitUrl, GitUrlError};
use crate::infrastructure::filesystem::source_path_writer::{write_source_path, SOURCE_PATH_FILE};
use crate::infrastructure::process::{
    CheckoutTool, InitRequest, SyncOptions, ToolError, DEFAULT_SYNC_JOBS,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// URLにパスが無い場合に `init -m` へ渡すマニフェスト名
pub const DEFAULT_MANIFEST_NAME: &str = "default.xml";

/// ワークフローの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    /// マニフェストURLのパース
    ParsingUrl,
    /// `repo init`
    Initializing,
    /// マニフェストの解決と読み込み
    ResolvingManifest,
    /// ソースリポジトリの検索
    Matching,
    /// `repo sync`
    Syncing,
    /// 結果ファイルの書き込み
    WritingOutput,
    /// 成功
    Done,
    /// 失敗
    Failed,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStage::ParsingUrl => "parsing-url",
            WorkflowStage::Initializing => "initializing",
            WorkflowStage::ResolvingManifest => "resolving-manifest",
            WorkflowStage::Matching => "matching",
            WorkflowStage::Syncing => "syncing",
            WorkflowStage::WritingOutput => "writing-output",
            WorkflowStage::Done => "done",
            WorkflowStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// LocateSourceRepo関連のエラー
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Error validating manifest URL: {0}")]
    InvalidManifestUrl(#[source] GitUrlError),

    #[error("Error executing 'repo init': {0}")]
    InitFailed(#[source] ToolError),

    #[error("Error parsing manifest file: {0}")]
    ManifestParseFailed(#[source] ManifestResolveError),

    #[error("Error: Source repo, {source_repo}, is not listed in the manifest file, {manifest}")]
    ProjectNotListed { source_repo: String, manifest: String },

    #[error("Error executing 'repo sync': {0}")]
    SyncFailed(#[source] ToolError),

    #[error("Error writing to {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkflowError {
    /// 失敗した状態
    pub fn stage(&self) -> WorkflowStage {
        match self {
            WorkflowError::InvalidManifestUrl(_) => WorkflowStage::ParsingUrl,
            WorkflowError::InitFailed(_) => WorkflowStage::Initializing,
            WorkflowError::ManifestParseFailed(_) => WorkflowStage::ResolvingManifest,
            WorkflowError::ProjectNotListed { .. } => WorkflowStage::Matching,
            WorkflowError::SyncFailed(_) => WorkflowStage::Syncing,
            WorkflowError::OutputWrite { .. } => WorkflowStage::WritingOutput,
        }
    }
}

/// ソースリポジトリ検索の設定
#[derive(Debug, Clone)]
pub struct LocateSourceRepoConfig {
    /// チェックアウトのルートディレクトリ（ツールの実行ディレクトリと同じ）
    pub checkout_root: PathBuf,

    /// 結果ファイル（相対パスの場合はチェックアウトルート基準）
    pub output_file: PathBuf,

    /// `repo sync` の並列数
    pub sync_jobs: usize,
}

impl Default for LocateSourceRepoConfig {
    fn default() -> Self {
        Self {
            checkout_root: PathBuf::from("."),
            output_file: PathBuf::from(SOURCE_PATH_FILE),
            sync_jobs: DEFAULT_SYNC_JOBS,
        }
    }
}

impl LocateSourceRepoConfig {
    pub fn new(checkout_root: impl Into<PathBuf>) -> Self {
        Self {
            checkout_root: checkout_root.into(),
            ..Self::default()
        }
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self
    }

    pub fn with_sync_jobs(mut self, sync_jobs: usize) -> Self {
        self.sync_jobs = sync_jobs;
        self
    }

    /// 書き込み先の結果ファイル
    pub fn output_path(&self) -> PathBuf {
        if self.output_file.is_absolute() || self.checkout_root == Path::new(".") {
            self.output_file.clone()
        } else {
            self.checkout_root.join(&self.output_file)
        }
    }
}

/// 成功時の結果
#[derive(Debug, Clone)]
pub struct LocateOutcome {
    /// パースしたマニフェストURL
    pub manifest_url: GitUrl,

    /// 一致したプロジェクト
    pub project: Project,

    /// 読み込んだマニフェストファイル
    pub manifest_file: PathBuf,

    /// 書き込んだ結果ファイル
    pub output_file: PathBuf,
}

impl LocateOutcome {
    /// ソースリポジトリのチェックアウト内パス
    pub fn source_path(&self) -> &str {
        &self.project.path
    }
}

/// マニフェストからワークスペースを作成し、ソースリポジトリのパスを出力するユースケース
///
/// URLのパース、`init`、マニフェストの解決、検索、`sync`、結果の書き込みを順に実行し、
/// 最初に失敗した段階で中断する。
pub struct LocateSourceRepoUseCase {
    config: LocateSourceRepoConfig,
    tool: Arc<dyn CheckoutTool>,
}

impl LocateSourceRepoUseCase {
    /// 新しいLocateSourceRepoUseCaseインスタンスを作成
    pub fn new(config: LocateSourceRepoConfig, tool: Arc<dyn CheckoutTool>) -> Self {
        Self { config, tool }
    }

    /// ワークフローを実行
    pub async fn execute(
        &self,
        manifest_url: &str,
        source_repo: &str,
    ) -> Result<LocateOutcome, WorkflowError> {
        match self.run_stages(manifest_url, source_repo).await {
            Ok(outcome) => {
                enter(WorkflowStage::Done);
                Ok(outcome)
            }
            Err(error) => {
                tracing::debug!(stage = %WorkflowStage::Failed, failed = %error.stage(), "workflow aborted");
                Err(error)
            }
        }
    }

    async fn run_stages(
        &self,
        manifest_url: &str,
        source_repo: &str,
    ) -> Result<LocateOutcome, WorkflowError> {
        enter(WorkflowStage::ParsingUrl);
        let git_url = GitUrl::new(manifest_url).map_err(WorkflowError::InvalidManifestUrl)?;
        let manifest_name = manifest_name_for(&git_url);

        enter(WorkflowStage::Initializing);
        let target = git_url.clone_target();
        let request = InitRequest::new(target.url, target.branch, manifest_name.clone());
        self.tool
            .init(&request)
            .await
            .map_err(WorkflowError::InitFailed)?;

        enter(WorkflowStage::ResolvingManifest);
        let resolver = ManifestResolver::new(Arc::clone(&self.tool), &self.config.checkout_root);
        let resolved = resolver
            .resolve()
            .await
            .map_err(WorkflowError::ManifestParseFailed)?;

        enter(WorkflowStage::Matching);
        let project = resolved
            .manifest
            .find_project(source_repo)
            .cloned()
            .ok_or_else(|| WorkflowError::ProjectNotListed {
                source_repo: source_repo.to_string(),
                manifest: manifest_name.clone(),
            })?;
        tracing::info!(name = %project.name, path = %project.path, "found source repository");

        enter(WorkflowStage::Syncing);
        let options = SyncOptions::default().with_jobs(self.config.sync_jobs);
        self.tool
            .sync(&options)
            .await
            .map_err(WorkflowError::SyncFailed)?;

        enter(WorkflowStage::WritingOutput);
        let output_file = self.config.output_path();
        println!("Writing source repository path to {}", output_file.display());
        write_source_path(&output_file, &project.path).map_err(|source| {
            WorkflowError::OutputWrite {
                path: output_file.clone(),
                source,
            }
        })?;

        Ok(LocateOutcome {
            manifest_url: git_url,
            project,
            manifest_file: resolved.path,
            output_file,
        })
    }
}

fn enter(stage: WorkflowStage) {
    tracing::debug!(%stage, "entering stage");
}

fn manifest_name_for(git_url: &GitUrl) -> String {
    if git_url.path().is_empty() {
        DEFAULT_MANIFEST_NAME.to_string()
    } else {
        git_url.path().to_string()
    }
}
