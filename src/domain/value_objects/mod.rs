pub mod git_url;
pub mod tool_version;

pub use git_url::{CloneTarget, GitUrl, GitUrlError, Protocol};
pub use tool_version::{ManifestLayout, ToolVersion};
