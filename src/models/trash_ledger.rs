use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// 移动到回收站前复核失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum TrashRejection {
    #[error("文件夹不存在（可能已被移动或删除）")]
    NotFound,

    #[error("文件夹已不再为空")]
    NoLongerEmpty,

    #[error("无法读取文件夹内容: {0}")]
    Unreadable(String),

    #[error("移动到回收站失败: {0}")]
    MoveFailed(String),
}

/// 单个文件夹的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rejection", rename_all = "snake_case")]
pub enum TrashResult {
    Moved,
    Rejected(TrashRejection),
}

impl TrashResult {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved)
    }

    pub fn rejection(&self) -> Option<&TrashRejection> {
        match self {
            Self::Moved => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for TrashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved => write!(f, "已移动到回收站"),
            Self::Rejected(reason) => write!(f, "{}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrashEntry {
    pub path: PathBuf,
    pub result: TrashResult,
}

/// 一次批量移动的结果台账，与输入路径一一对应且顺序一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrashLedger {
    entries: Vec<TrashEntry>,
}

impl TrashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<PathBuf>, result: TrashResult) {
        self.entries.push(TrashEntry {
            path: path.into(),
            result,
        });
    }

    pub fn entries(&self) -> &[TrashEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 成功移动的路径
    pub fn moved(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.result.is_moved())
            .map(|e| e.path.as_path())
    }

    /// 失败的路径及原因
    pub fn rejected(&self) -> impl Iterator<Item = (&Path, &TrashRejection)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.rejection().map(|r| (e.path.as_path(), r)))
    }

    pub fn moved_count(&self) -> usize {
        self.moved().count()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected().count()
    }

    /// 生成可复制的汇总报告
    pub fn summary_report(&self) -> String {
        let rule = "=".repeat(50);
        let mut lines = vec![rule.clone(), "移动到回收站汇总".to_string(), "-".repeat(50)];

        let moved: Vec<&Path> = self.moved().collect();
        let rejected: Vec<(&Path, &TrashRejection)> = self.rejected().collect();

        if !moved.is_empty() {
            lines.push(format!("成功移动 {} 个文件夹到回收站:", moved.len()));
            for path in &moved {
                lines.push(format!("  - {}", path.display()));
            }
        }

        if !rejected.is_empty() {
            if !moved.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("移动失败 {} 个文件夹:", rejected.len()));
            for (path, reason) in &rejected {
                lines.push(format!("  - {}: {}", path.display(), reason));
            }
        }

        if moved.is_empty() && rejected.is_empty() {
            lines.push("没有文件夹被移动。".to_string());
        }

        lines.push(rule);
        lines.join("\n")
    }
}
