const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// 格式化字节数为友好显示格式 (Bytes, KB, MB, GB)
pub fn format_size(size_in_bytes: u64) -> String {
    if size_in_bytes < KB {
        format!("{} Bytes", size_in_bytes)
    } else if size_in_bytes < MB {
        format!("{:.2} KB", size_in_bytes as f64 / KB as f64)
    } else if size_in_bytes < GB {
        format!("{:.2} MB", size_in_bytes as f64 / MB as f64)
    } else {
        format!("{:.2} GB", size_in_bytes as f64 / GB as f64)
    }
}
