use std::collections::HashSet;
use std::ffi::OsStr;

use crate::config::DefaultConfig;

/// 判断文件夹是否为空时视为"不可见"的文件名集合
///
/// 名称区分大小写，构建后只读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// 使用指定的文件名创建忽略集合
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// 不忽略任何文件的空集合
    pub fn empty() -> Self {
        Self { names: HashSet::new() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// 非 UTF-8 的文件名永远不会被忽略
    pub fn contains_os(&self, name: &OsStr) -> bool {
        name.to_str().map(|n| self.contains(n)).unwrap_or(false)
    }

    /// 按字典序返回所有名称
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(DefaultConfig::default_ignored_names())
    }
}
