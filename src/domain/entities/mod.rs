pub mod manifest;
pub mod tool_config;

pub use manifest::{find_project, Manifest, Project};
pub use tool_config::{ConfigOverrides, ToolConfig};
