use crate::domain::entities::manifest::Manifest;
use crate::domain::value_objects::tool_version::{ManifestLayout, ToolVersion};
use crate::infrastructure::process::{CheckoutTool, ToolError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// ManifestResolver関連のエラー
#[derive(Debug, Error)]
pub enum ManifestResolveError {
    #[error("Failed to query checkout tool version: {0}")]
    VersionQuery(#[source] ToolError),

    #[error("Manifest file not found at {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest file read failed for {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },
}

impl ManifestResolveError {
    /// 対象のマニフェストファイル（バージョン取得の失敗時は `None`）
    pub fn path(&self) -> Option<&Path> {
        match self {
            ManifestResolveError::VersionQuery(_) => None,
            ManifestResolveError::NotFound { path, .. }
            | ManifestResolveError::ReadFailed { path, .. }
            | ManifestResolveError::Malformed { path, .. } => Some(path),
        }
    }
}

/// 解決済みのマニフェスト
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    /// パース結果
    pub manifest: Manifest,

    /// 読み込んだファイル
    pub path: PathBuf,

    /// 使用した配置
    pub layout: ManifestLayout,

    /// 検出したツールのバージョン
    pub version: Option<ToolVersion>,
}

/// `init` 後のチェックアウトからマニフェストを探して読み込むサービス
pub struct ManifestResolver {
    /// バージョン取得に使用するチェックアウトツール
    tool: Arc<dyn CheckoutTool>,

    /// チェックアウトのルートディレクトリ
    checkout_root: PathBuf,
}

impl ManifestResolver {
    /// 新しいManifestResolverインスタンスを作成
    pub fn new(tool: Arc<dyn CheckoutTool>, checkout_root: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            checkout_root: checkout_root.into(),
        }
    }

    /// ツールのバージョンから配置を決め、マニフェストを読み込む
    pub async fn resolve(&self) -> Result<ResolvedManifest, ManifestResolveError> {
        let output = self
            .tool
            .version()
            .await
            .map_err(ManifestResolveError::VersionQuery)?;

        let version = ToolVersion::detect(&output.output);
        match version {
            Some(version) => tracing::debug!(%version, "detected checkout tool version"),
            None => tracing::warn!("could not detect checkout tool version, assuming the nested manifest layout"),
        }

        let layout = ManifestLayout::for_version(version);
        let path = layout.manifest_path(&self.checkout_root);
        tracing::debug!(path = %path.display(), ?layout, "reading manifest");

        let content = read_manifest_file(&path).await?;
        let manifest = Manifest::from_xml(&content).map_err(|source| {
            ManifestResolveError::Malformed {
                path: path.clone(),
                source,
            }
        })?;

        Ok(ResolvedManifest {
            manifest,
            path,
            layout,
            version,
        })
    }
}

/// ファイルハンドルはこの関数の中でのみ保持する
async fn read_manifest_file(path: &Path) -> Result<String, ManifestResolveError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ManifestResolveError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .await
        .map_err(|source| ManifestResolveError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::manifest::Project;
    use crate::infrastructure::process::{MockCheckoutTool, ToolOutput};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MANIFEST_XML: &str = r#"<manifest>
  <remote name="origin" fetch=".." />
  <project name="filbird/v4-repo-test.git" path="primary" />
  <project name="filbird/v4-cron-test.git" path="dependencies/cron" />
</manifest>"#;

    fn tool_reporting(version_output: &'static str) -> Arc<dyn CheckoutTool> {
        let mut tool = MockCheckoutTool::new();
        tool.expect_version()
            .times(1)
            .returning(move || Ok(ToolOutput::new("repo version", version_output)));
        Arc::new(tool)
    }

    fn write_manifest(root: &TempDir, layout: ManifestLayout, content: &[u8]) -> PathBuf {
        let path = layout.manifest_path(root.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn expected_manifest() -> Manifest {
        Manifest::new(vec![
            Project::new("filbird/v4-repo-test.git", "primary"),
            Project::new("filbird/v4-cron-test.git", "dependencies/cron"),
        ])
    }

    #[tokio::test]
    async fn test_resolve_nested_layout() {
        let root = TempDir::new().unwrap();
        let path = write_manifest(&root, ManifestLayout::Nested, MANIFEST_XML.as_bytes());

        let resolver = ManifestResolver::new(tool_reporting("repo version v2.45\n"), root.path());
        let resolved = resolver.resolve().await.unwrap();

        assert_eq!(resolved.manifest, expected_manifest());
        assert_eq!(resolved.path, path);
        assert_eq!(resolved.layout, ManifestLayout::Nested);
        assert_eq!(resolved.version, Some(ToolVersion::new(2, 45)));
    }

    #[tokio::test]
    async fn test_resolve_root_layout_for_old_tool() {
        let root = TempDir::new().unwrap();
        let path = write_manifest(&root, ManifestLayout::Root, MANIFEST_XML.as_bytes());

        let resolver = ManifestResolver::new(tool_reporting("repo version v1.13.9\n"), root.path());
        let resolved = resolver.resolve().await.unwrap();

        assert_eq!(resolved.manifest, expected_manifest());
        assert_eq!(resolved.path, path);
        assert_eq!(resolved.layout, ManifestLayout::Root);
    }

    #[tokio::test]
    async fn test_resolve_unknown_version_uses_nested_layout() {
        let root = TempDir::new().unwrap();
        write_manifest(&root, ManifestLayout::Nested, MANIFEST_XML.as_bytes());

        let resolver = ManifestResolver::new(tool_reporting("repo: unknown build\n"), root.path());
        let resolved = resolver.resolve().await.unwrap();

        assert_eq!(resolved.layout, ManifestLayout::Nested);
        assert_eq!(resolved.version, None);
    }

    #[tokio::test]
    async fn test_version_query_failure() {
        let root = TempDir::new().unwrap();
        let mut tool = MockCheckoutTool::new();
        tool.expect_version()
            .times(1)
            .returning(|| Err(ToolError::command_failed("repo version", Some(1), "boom")));

        let resolver = ManifestResolver::new(Arc::new(tool), root.path());
        let error = resolver.resolve().await.unwrap_err();

        assert!(matches!(error, ManifestResolveError::VersionQuery(_)));
        assert!(error.path().is_none());
    }

    #[tokio::test]
    async fn test_missing_manifest_file() {
        let root = TempDir::new().unwrap();
        // 古い配置にだけ置いても新しいツールでは見つからない
        write_manifest(&root, ManifestLayout::Root, MANIFEST_XML.as_bytes());

        let resolver = ManifestResolver::new(tool_reporting("repo version v2.4\n"), root.path());
        let error = resolver.resolve().await.unwrap_err();

        match &error {
            ManifestResolveError::NotFound { path, source } => {
                assert_eq!(path, &ManifestLayout::Nested.manifest_path(root.path()));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().starts_with("Manifest file not found at"));
    }

    #[tokio::test]
    async fn test_unreadable_manifest_content() {
        let root = TempDir::new().unwrap();
        write_manifest(&root, ManifestLayout::Nested, &[0xff, 0xfe, 0xfd]);

        let resolver = ManifestResolver::new(tool_reporting("repo version v2.45\n"), root.path());
        let error = resolver.resolve().await.unwrap_err();

        assert!(matches!(error, ManifestResolveError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn test_malformed_manifest() {
        let root = TempDir::new().unwrap();
        let path = write_manifest(
            &root,
            ManifestLayout::Nested,
            br#"<manifest><project name="a" path="b" />"#,
        );

        let resolver = ManifestResolver::new(tool_reporting("repo version v2.45\n"), root.path());
        let error = resolver.resolve().await.unwrap_err();

        assert!(matches!(error, ManifestResolveError::Malformed { .. }));
        assert_eq!(error.path(), Some(path.as_path()));
    }
}
