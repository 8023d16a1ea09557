pub mod source_path_writer;

pub use source_path_writer::{write_source_path, SOURCE_PATH_FILE, SOURCE_PATH_MODE};
