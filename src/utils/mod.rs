pub mod size_format;
pub mod time_format;

pub use size_format::format_size;
pub use time_format::{format_duration, format_time};
