pub mod storage;

pub use storage::{DataDirectory, ExportPaths, StorageError};
