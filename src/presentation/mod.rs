/// Presentation layer
///
/// Command line parsing, configuration merging and exit codes.
pub mod cli;
