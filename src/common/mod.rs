/// Shared utilities
///
/// - Crate-wide error type and result alias
/// - Logging setup
pub mod error;
pub mod logging;
pub mod result;
