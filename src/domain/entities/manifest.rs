use serde::Deserialize;

/// `<project>` 要素
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// リポジトリ名（通常は `org/repo` または `org/repo.git`）
    #[serde(rename = "@name", default)]
    pub name: String,

    /// チェックアウト内での相対パス
    #[serde(rename = "@path", default)]
    pub path: String,
}

impl Project {
    /// 新しいProjectインスタンスを作成
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// 末尾の `.git` を除いた名前
    pub fn normalized_name(&self) -> &str {
        normalize_name(&self.name)
    }
}

/// `<manifest>` 要素
///
/// `project` 以外の要素や属性は無視する。`project` の順序は文書の順序のまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// プロジェクトのリスト
    #[serde(rename = "project", default)]
    pub projects: Vec<Project>,
}

impl Manifest {
    /// 新しいManifestインスタンスを作成
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// XML文字列からマニフェストを読み込む
    pub fn from_xml(xml: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(xml)
    }

    /// 名前が一致する最初のプロジェクトを取得
    ///
    /// 両側の末尾の `.git` を取り除いてから完全一致で比較する。
    pub fn find_project(&self, name: &str) -> Option<&Project> {
        let wanted = normalize_name(name);
        self.projects
            .iter()
            .find(|project| project.normalized_name() == wanted)
    }
}

/// 名前が一致する最初のプロジェクトを取得
pub fn find_project<'a>(manifest: &'a Manifest, name: &str) -> Option<&'a Project> {
    manifest.find_project(name)
}

fn normalize_name(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}
