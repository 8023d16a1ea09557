use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ブランチ指定が無い場合に使用するブランチ名
pub const DEFAULT_BRANCH: &str = "master";

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GitUrlError {
    /// どちらの形式にも一致しなかった（元の文字列をそのまま保持する）
    #[error("Not a valid git url {0}")]
    InvalidFormat(String),
}

/// URLのプロトコル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// `git@host:org/repo.git`
    Ssh,
    /// `https://host/org/repo.git`
    Https,
}

impl Protocol {
    /// 小文字のプロトコル名
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// チェックアウトツールの `-u` / `-b` に渡す値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTarget {
    /// `.git` 付きのクローンURL（パスとブランチは含まない）
    pub url: String,

    /// ブランチ名（パース結果をそのまま使用）
    pub branch: String,
}

/// マニフェストリポジトリのGit URLの値オブジェクト
///
/// 受け付ける形式:
///
/// - `git@<host>:<org>/<repo>.git[/<path>][#<branch>]`
/// - `https://<host>/<org>/<repo>.git[/<path>][#<branch>]`
///
/// `<path>` はリポジトリ内のマニフェストファイル、`<branch>` はチェックアウトする
/// ブランチ。`#` 以降はそのまま保持されるため `##test` はブランチ `#test` になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitUrl {
    /// プロトコル
    protocol: Protocol,

    /// ホスト名
    host: String,

    /// 組織名
    org: String,

    /// リポジトリ名（`.git` を除く）
    repo: String,

    /// リポジトリ内のパス（先頭の `/` は除去済み、空の場合あり）
    path: String,

    /// ブランチ名（空にはならない）
    branch: String,
}

lazy_static! {
    /// `git@<host>:<org>/<repo>.git[/<path>][#<branch>]`
    static ref SSH_PATTERN: Regex =
        Regex::new(r"^git@([^/:#]+):([^/:#]+)/+([^/:#]+)\.git(/[^#]*)?(#.+)?")
            .expect("Failed to compile ssh url pattern");

    /// `https://<host>/<org>/<repo>.git[/<path>][#<branch>]`
    static ref HTTPS_PATTERN: Regex =
        Regex::new(r"^https://([^/:#]+)/([^/:#]+)/+([^/:#]+)\.git(/[^#]*)?(#.+)?")
            .expect("Failed to compile https url pattern");
}

impl GitUrl {
    /// 文字列をパースして新しいGitUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        if let Some(captures) = SSH_PATTERN.captures(url) {
            return Ok(Self::from_captures(Protocol::Ssh, &captures));
        }

        if let Some(captures) = HTTPS_PATTERN.captures(url) {
            return Ok(Self::from_captures(Protocol::Https, &captures));
        }

        Err(GitUrlError::InvalidFormat(url.to_string()))
    }

    fn from_captures(protocol: Protocol, captures: &Captures<'_>) -> Self {
        let group = |index: usize| captures.get(index).map_or("", |m| m.as_str());

        // `#` は1つだけ取り除く
        let branch = match captures.get(5) {
            Some(fragment) => fragment.as_str()[1..].to_string(),
            None => DEFAULT_BRANCH.to_string(),
        };

        Self {
            protocol,
            host: group(1).to_string(),
            org: group(2).to_string(),
            repo: group(3).to_string(),
            path: group(4).trim_start_matches('/').to_string(),
            branch,
        }
    }

    /// プロトコルを取得
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// ホスト名を取得
    pub fn host(&self) -> &str {
        &self.host
    }

    /// 組織名を取得
    pub fn org(&self) -> &str {
        &self.org
    }

    /// リポジトリ名を取得
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// リポジトリ内のパスを取得
    pub fn path(&self) -> &str {
        &self.path
    }

    /// ブランチ名を取得
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// 元のプロトコルのままクローンURLを生成
    pub fn clone_url(&self) -> String {
        match self.protocol {
            Protocol::Ssh => format!("git@{}:{}/{}.git", self.host, self.org, self.repo),
            Protocol::Https => format!("https://{}/{}/{}.git", self.host, self.org, self.repo),
        }
    }

    /// クローンURLとブランチの組を取得
    pub fn clone_target(&self) -> CloneTarget {
        CloneTarget {
            url: self.clone_url(),
            branch: self.branch.clone(),
        }
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone_url())?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        write!(f, "#{}", self.branch)
    }
}

impl FromStr for GitUrl {
    type Err = GitUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GitUrl::new(s)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::new(url)
    }
}

impl TryFrom<String> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        GitUrl::new(&url)
    }
}
