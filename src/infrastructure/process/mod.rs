pub mod repo_tool;

#[cfg(test)]
pub use repo_tool::MockCheckoutTool;
pub use repo_tool::{
    CheckoutTool,
    InitRequest,
    RepoTool,
    SyncOptions,
    ToolError,
    ToolOutput,
    DEFAULT_REPO_EXECUTABLE,
    DEFAULT_SYNC_JOBS,
};
