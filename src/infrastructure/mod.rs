/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Process execution (the `repo` checkout tool)
/// - File system operations (the source path output file)
pub mod filesystem;
pub mod process;

// Re-export commonly used types
pub use filesystem::source_path_writer::{write_source_path, SOURCE_PATH_FILE};
pub use process::{CheckoutTool, InitRequest, RepoTool, SyncOptions, ToolError, ToolOutput};
