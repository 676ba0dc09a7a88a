use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 扫描时被判定为"实际为空"的文件夹
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmptyFolderRecord {
    pub path: PathBuf,
}

impl EmptyFolderRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for EmptyFolderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// 按路径字符串字典序排序，供展示使用
pub fn sort_records(records: &mut [EmptyFolderRecord]) {
    records.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
}

/// 一次扫描的最终状态
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// 扫描完成，结果按遍历顺序排列
    Completed(Vec<EmptyFolderRecord>),

    /// 用户取消
    Cancelled,

    /// 扫描失败，结果不可信
    Failed(String),
}

impl ScanOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// 只有完成的扫描才有结果
    pub fn into_results(self) -> Option<Vec<EmptyFolderRecord>> {
        match self {
            Self::Completed(results) => Some(results),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(results) if results.is_empty() => write!(f, "未发现空文件夹。"),
            Self::Completed(results) => write!(f, "发现 {} 个空文件夹。", results.len()),
            Self::Cancelled => write!(f, "扫描已被用户取消。"),
            Self::Failed(reason) => write!(f, "扫描时出错: {}", reason),
        }
    }
}

/// 扫描任务发送给前端的事件
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// 状态文本
    Status(String),

    /// 进度条最大值（预扫描统计出的目录总数）
    MaxProgress(usize),

    /// 已处理的目录数
    Progress(usize),

    /// 终止事件，每次扫描恰好一个
    Finished(ScanOutcome),
}

impl ScanEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// 可序列化的扫描报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// 扫描的根路径
    pub root: PathBuf,

    /// 扫描开始时间
    pub scan_start_time: DateTime<Utc>,

    /// 扫描耗时（毫秒）
    pub duration_ms: u64,

    /// 扫描的目录数量
    pub total_directories: usize,

    /// 空文件夹，已排序
    pub empty_folders: Vec<EmptyFolderRecord>,
}

impl ScanReport {
    pub fn new(
        root: PathBuf,
        scan_start_time: DateTime<Utc>,
        duration: Duration,
        total_directories: usize,
        mut empty_folders: Vec<EmptyFolderRecord>,
    ) -> Self {
        sort_records(&mut empty_folders);
        Self {
            root,
            scan_start_time,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            total_directories,
            empty_folders,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
