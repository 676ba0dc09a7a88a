use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 大小计算器 - 尽力统计目录下所有文件的总大小，仅用于展示
///
/// 不跟随符号链接，单个目录项出错时计为 0，根路径不是可访问的目录时返回 0。
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator;

/// 目录大小统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySizeInfo {
    /// 目录路径
    pub path: PathBuf,

    /// 所有普通文件的大小之和
    pub size: u64,

    /// 计入大小的文件数量
    pub file_count: usize,

    /// 跳过的目录项（符号链接、无法访问的项）
    pub skipped_entries: usize,
}

impl SizeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算目录总大小（字节）
    pub fn total_size(&self, path: &Path) -> u64 {
        self.directory_size_info(path).size
    }

    /// 计算目录大小及文件统计
    pub fn directory_size_info(&self, path: &Path) -> DirectorySizeInfo {
        let mut info = DirectorySizeInfo {
            path: path.to_path_buf(),
            ..Default::default()
        };

        // 只统计目录之下的文件，普通文件或不存在的路径计为 0
        if !path.is_dir() {
            tracing::debug!("不是可访问的目录，大小计为 0: {}", path.display());
            return info;
        }

        for entry in WalkDir::new(path).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("计算大小时跳过: {}", err);
                    info.skipped_entries += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                info.skipped_entries += 1;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    info.size += metadata.len();
                    info.file_count += 1;
                }
                Err(err) => {
                    tracing::debug!("无法读取文件元数据: {}: {}", entry.path().display(), err);
                    info.skipped_entries += 1;
                }
            }
        }

        info
    }

    /// 在阻塞线程池中计算目录大小
    pub async fn calculate_directory_size(&self, path: &Path) -> DirectorySizeInfo {
        let calculator = self.clone();
        let dir = path.to_path_buf();

        match tokio::task::spawn_blocking(move || calculator.directory_size_info(&dir)).await {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!("计算目录大小的任务失败: {}: {}", path.display(), err);
                DirectorySizeInfo {
                    path: path.to_path_buf(),
                    ..Default::default()
                }
            }
        }
    }
}
