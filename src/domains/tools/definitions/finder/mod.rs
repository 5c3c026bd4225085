pub mod open_file;
pub mod search_files;

pub use open_file::{OpenFileParams, OpenFileTool};
pub use search_files::{NO_MATCHES, SearchFilesParams, SearchFilesTool};
