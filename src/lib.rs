pub mod config;
pub mod models;
pub mod operations;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use config::Config;
pub use models::{DirectoryEntrySnapshot, EmptyFolderRecord, IgnoreSet, ScanEvent, ScanOutcome, TrashLedger};
pub use operations::{TrashBackend, TrashOperation};
pub use scanner::{PathClassifier, ScanController, ScanEngine, ScanHandle, SizeCalculator};
