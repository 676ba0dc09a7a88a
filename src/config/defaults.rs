use std::collections::BTreeSet;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认忽略的文件名（系统自动生成的标记文件）
    pub fn default_ignored_names() -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        // macOS Finder
        names.insert(".DS_Store".to_string());

        // Windows 资源管理器
        names.insert("Thumbs.db".to_string());
        names.insert("desktop.ini".to_string());

        names
    }

    /// 每处理多少个目录发送一次进度事件
    pub fn default_progress_batch_size() -> usize {
        500
    }

    /// 前端轮询事件通道的间隔（毫秒）
    pub fn default_poll_interval_ms() -> u64 {
        100
    }
}
