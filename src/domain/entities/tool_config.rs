use crate::infrastructure::filesystem::SOURCE_PATH_FILE;
use crate::infrastructure::process::{DEFAULT_REPO_EXECUTABLE, DEFAULT_SYNC_JOBS};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 設定ファイル（YAML）の構造
///
/// ```yaml
/// repo_executable: /usr/local/bin/repo
/// sync_jobs: 8
/// output_file: sourcePath
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// チェックアウトツールの実行ファイル
    #[validate(length(min = 1, message = "repo executable must not be empty"))]
    pub repo_executable: String,

    /// `repo sync` の並列数
    #[validate(range(min = 1, max = 128, message = "sync jobs must be between 1 and 128"))]
    pub sync_jobs: usize,

    /// 結果ファイル
    #[validate(length(min = 1, message = "output file must not be empty"))]
    pub output_file: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            repo_executable: DEFAULT_REPO_EXECUTABLE.to_string(),
            sync_jobs: DEFAULT_SYNC_JOBS,
            output_file: SOURCE_PATH_FILE.to_string(),
        }
    }
}

/// コマンドラインや環境変数からの上書き値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// チェックアウトツールの実行ファイル
    pub repo_executable: Option<String>,

    /// `repo sync` の並列数
    pub sync_jobs: Option<usize>,

    /// 結果ファイル
    pub output_file: Option<String>,
}

impl ToolConfig {
    /// YAML文字列から設定を読み込む（空の場合はデフォルト値）
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// 指定された値で上書きする
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(repo_executable) = overrides.repo_executable {
            self.repo_executable = repo_executable;
        }
        if let Some(sync_jobs) = overrides.sync_jobs {
            self.sync_jobs = sync_jobs;
        }
        if let Some(output_file) = overrides.output_file {
            self.output_file = output_file;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.repo_executable, "repo");
        assert_eq!(config.sync_jobs, 4);
        assert_eq!(config.output_file, "sourcePath");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ToolConfig::from_yaml_str("sync_jobs: 8\n").unwrap();
        assert_eq!(
            config,
            ToolConfig {
                sync_jobs: 8,
                ..ToolConfig::default()
            }
        );
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(ToolConfig::from_yaml_str("  \n").unwrap(), ToolConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ToolConfig::from_yaml_str("sync_job: 8\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = ToolConfig::from_yaml_str("repo_executable: /opt/repo\nsync_jobs: 2\n")
            .unwrap()
            .with_overrides(ConfigOverrides {
                sync_jobs: Some(16),
                output_file: Some("out/path".to_string()),
                ..ConfigOverrides::default()
            });

        assert_eq!(config.repo_executable, "/opt/repo");
        assert_eq!(config.sync_jobs, 16);
        assert_eq!(config.output_file, "out/path");
    }

    #[test]
    fn test_validation() {
        let config = ToolConfig {
            sync_jobs: 0,
            ..ToolConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ToolConfig {
            repo_executable: String::new(),
            ..ToolConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
