use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

/// チェックアウトツールのバージョン（`vMAJOR.MINOR`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolVersion {
    /// メジャーバージョン
    pub major: u32,

    /// マイナーバージョン
    pub minor: u32,
}

/// マニフェストを入れ子のディレクトリに置くようになった最初のバージョン
pub const NESTED_LAYOUT_SINCE: ToolVersion = ToolVersion { major: 2, minor: 4 };

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r"repo version v(\d+)\.(\d+)")
        .expect("Failed to compile version pattern");
}

impl ToolVersion {
    /// 新しいToolVersionインスタンスを作成
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// バージョンコマンドの出力から最初の `repo version vMAJOR.MINOR` を抽出する
    ///
    /// 見つからない場合や数値が大きすぎる場合は `None`。
    pub fn detect(output: &str) -> Option<Self> {
        let captures = VERSION_PATTERN.captures(output)?;
        let major = captures.get(1)?.as_str().parse().ok()?;
        let minor = captures.get(2)?.as_str().parse().ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// チェックアウト内のマニフェストファイルの配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLayout {
    /// `.repo/manifests/manifest.xml`（2.4以降、またはバージョン不明）
    Nested,

    /// `.repo/manifest.xml`（2.4より前）
    Root,
}

impl ManifestLayout {
    /// 検出したバージョンから配置を決定する
    pub fn for_version(version: Option<ToolVersion>) -> Self {
        match version {
            Some(version) if version < NESTED_LAYOUT_SINCE => ManifestLayout::Root,
            _ => ManifestLayout::Nested,
        }
    }

    /// チェックアウトルートからの相対パス
    pub fn relative_path(&self) -> &'static Path {
        match self {
            ManifestLayout::Nested => Path::new(".repo/manifests/manifest.xml"),
            ManifestLayout::Root => Path::new(".repo/manifest.xml"),
        }
    }

    /// チェックアウトルートを基準にしたマニフェストのパス
    pub fn manifest_path(&self, checkout_root: &Path) -> PathBuf {
        checkout_root.join(self.relative_path())
    }
}
