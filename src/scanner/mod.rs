pub mod inspector;
pub mod path_classifier;
pub mod scan_controller;
pub mod scan_engine;
pub mod size_calculator;

pub use inspector::inspect;
pub use path_classifier::PathClassifier;
pub use scan_controller::{ScanController, ScanHandle};
pub use scan_engine::{ScanEngine, ScanError, ScanProgress};
pub use size_calculator::{DirectorySizeInfo, SizeCalculator};
