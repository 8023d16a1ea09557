use crate::common::error::SdRepoError;

/// sd-repo全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use sd_repo::common::result::SdRepoResult;
/// use sd_repo::common::error::SdRepoError;
///
/// fn example_function() -> SdRepoResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> SdRepoResult<()> {
///     Err(SdRepoError::validation_error("sync_jobs", "out of range", Some("0".to_string())))
/// }
/// ```
pub type SdRepoResult<T> = Result<T, SdRepoError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// 設定エラーとしてSdRepoResultに変換
    ///
    /// ```
    /// use sd_repo::common::result::{ResultExt, SdRepoResult};
    ///
    /// let parsed: Result<u32, std::num::ParseIntError> = "four".parse();
    /// let result: SdRepoResult<u32> = parsed.with_config_error("Invalid job count");
    /// assert!(result.is_err());
    /// ```
    fn with_config_error(self, message: impl Into<String>) -> SdRepoResult<T>
    where
        E: std::error::Error + Send + Sync + 'static;

    /// ファイルシステムエラーとしてSdRepoResultに変換
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> SdRepoResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_config_error(self, message: impl Into<String>) -> SdRepoResult<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.map_err(|e| SdRepoError::config_error_with_source(message, e))
    }

    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> SdRepoResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| SdRepoError::filesystem_error_with_source(message, path, e.into()))
    }
}
