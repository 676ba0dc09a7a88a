use std::ffi::OsStr;

use crate::models::IgnoreSet;

/// 路径分类器 - 判断文件名是否可忽略，以及目录是否"实际为空"
///
/// 纯函数，不做任何 I/O。
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    ignore_set: IgnoreSet,
}

impl PathClassifier {
    pub fn new(ignore_set: IgnoreSet) -> Self {
        Self { ignore_set }
    }

    /// 文件名是否在忽略集合中
    pub fn is_ignorable(&self, name: impl AsRef<OsStr>) -> bool {
        self.ignore_set.contains_os(name.as_ref())
    }

    /// 没有子目录且没有有效文件时为空
    pub fn is_effectively_empty(subdir_count: usize, significant_file_count: usize) -> bool {
        subdir_count == 0 && significant_file_count == 0
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore_set
    }
}
