use serde::Serialize;
use std::path::PathBuf;

/// 按是否属于忽略集合拆分的一组目录项名称
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryGroup {
    /// 属于忽略集合的名称
    pub ignored: Vec<String>,

    /// 不属于忽略集合的名称
    pub significant: Vec<String>,
}

impl EntryGroup {
    pub fn push(&mut self, name: String, ignorable: bool) {
        if ignorable {
            self.ignored.push(name);
        } else {
            self.significant.push(name);
        }
    }

    /// 总数（忽略的 + 有效的）
    pub fn count(&self) -> usize {
        self.ignored.len() + self.significant.len()
    }

    pub(crate) fn sort(&mut self) {
        self.ignored.sort();
        self.significant.sort();
    }
}

/// 某个目录在某一时刻的直接子项快照
///
/// 每次都重新读取文件系统，从不缓存：扫描和操作之间文件系统可能已经变化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntrySnapshot {
    /// 目录路径
    pub path: PathBuf,

    /// 子目录（包含指向目录的符号链接）
    pub subdirectories: EntryGroup,

    /// 文件（包含其他所有类型的目录项）
    pub files: EntryGroup,
}

impl DirectoryEntrySnapshot {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            subdirectories: EntryGroup::default(),
            files: EntryGroup::default(),
        }
    }

    /// 没有子目录，也没有有效文件
    pub fn is_effectively_empty(&self) -> bool {
        crate::scanner::PathClassifier::is_effectively_empty(
            self.subdirectories.count(),
            self.files.significant.len(),
        )
    }

    /// 所有子项（无论文件还是目录）的名称都在忽略集合中
    pub fn has_only_ignored_entries(&self) -> bool {
        self.subdirectories.significant.is_empty() && self.files.significant.is_empty()
    }

    /// 被忽略的所有子项名称，按字典序
    pub fn ignored_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .subdirectories
            .ignored
            .iter()
            .chain(self.files.ignored.iter())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(subdirs: &[(&str, bool)], files: &[(&str, bool)]) -> DirectoryEntrySnapshot {
        let mut snapshot = DirectoryEntrySnapshot::new(PathBuf::from("/data"));
        for (name, ignorable) in subdirs {
            snapshot.subdirectories.push(name.to_string(), *ignorable);
        }
        for (name, ignorable) in files {
            snapshot.files.push(name.to_string(), *ignorable);
        }
        snapshot
    }

    #[test]
    fn test_no_entries_is_empty() {
        let s = snapshot(&[], &[]);
        assert!(s.is_effectively_empty());
        assert!(s.has_only_ignored_entries());
        assert!(s.ignored_names().is_empty());
    }

    #[test]
    fn test_only_ignored_files_is_empty() {
        let s = snapshot(&[], &[(".DS_Store", true), ("Thumbs.db", true)]);
        assert!(s.is_effectively_empty());
        assert_eq!(s.ignored_names(), vec![".DS_Store", "Thumbs.db"]);
    }

    #[test]
    fn test_significant_file_is_not_empty() {
        let s = snapshot(&[], &[(".DS_Store", true), ("notes.txt", false)]);
        assert!(!s.is_effectively_empty());
        assert!(!s.has_only_ignored_entries());
    }

    #[test]
    fn test_any_subdirectory_is_not_empty() {
        // 即使子目录名在忽略集合中，扫描时也不算空
        let s = snapshot(&[(".DS_Store", true)], &[]);
        assert!(!s.is_effectively_empty());
        assert!(s.has_only_ignored_entries());
    }
}
