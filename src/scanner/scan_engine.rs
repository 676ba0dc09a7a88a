use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::config::DefaultConfig;
use crate::models::{EmptyFolderRecord, ScanEvent, ScanOutcome};
use crate::scanner::inspect;
use crate::scanner::PathClassifier;

/// 导致整次扫描中止的错误
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("无法访问扫描根目录 {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("扫描根路径不是目录: {0}")]
    NotADirectory(PathBuf),
}

/// 扫描进度信息，只在扫描线程内部修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanProgress {
    /// 预扫描统计出的目录总数
    pub total_directories: usize,

    /// 已处理的目录数量
    pub processed_directories: usize,

    /// 最近处理的路径
    pub current_path: Option<PathBuf>,
}

/// 扫描引擎 - 两遍遍历：先统计目录数，再自底向上找出空文件夹
///
/// 两遍都在目录边界检查取消信号。进度事件每处理 `batch_size` 个目录发送一次，
/// 完成时总会再发送一次最终进度。
#[derive(Debug, Clone)]
pub struct ScanEngine {
    classifier: Arc<PathClassifier>,
    batch_size: usize,
}

impl ScanEngine {
    pub fn new(classifier: Arc<PathClassifier>) -> Self {
        Self {
            classifier,
            batch_size: DefaultConfig::default_progress_batch_size(),
        }
    }

    /// 设置进度事件的批次大小（至少为 1）
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// 执行扫描，将所有事件（包括终止事件）发送到通道
    pub fn run(&self, root: &Path, events: &mpsc::UnboundedSender<ScanEvent>, cancel: &CancellationToken) {
        let outcome = self.scan_with(root, cancel, |event| {
            // 接收端已关闭时继续执行，直到观察到取消信号
            let _ = events.send(event);
        });
        let _ = events.send(ScanEvent::Finished(outcome));
    }

    /// 执行扫描，非终止事件交给回调，返回最终结果
    pub fn scan_with<F>(&self, root: &Path, cancel: &CancellationToken, mut emit: F) -> ScanOutcome
    where
        F: FnMut(ScanEvent),
    {
        tracing::info!("开始扫描空文件夹: {}", root.display());

        let outcome = match self.execute(root, cancel, &mut emit) {
            Ok(Some(results)) => ScanOutcome::Completed(results),
            Ok(None) => ScanOutcome::Cancelled,
            Err(err) => ScanOutcome::Failed(err.to_string()),
        };

        match &outcome {
            ScanOutcome::Completed(results) => {
                tracing::info!("扫描完成，发现 {} 个空文件夹: {}", results.len(), root.display());
            }
            ScanOutcome::Cancelled => tracing::info!("扫描已取消: {}", root.display()),
            ScanOutcome::Failed(reason) => tracing::warn!("扫描失败: {}", reason),
        }

        outcome
    }

    fn execute<F>(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        emit: &mut F,
    ) -> Result<Option<Vec<EmptyFolderRecord>>, ScanError>
    where
        F: FnMut(ScanEvent),
    {
        if cancel.is_cancelled() {
            return Ok(None);
        }

        emit(ScanEvent::Status("正在预扫描，统计目录数量...".to_string()));
        Self::check_root(root)?;

        // 第一遍：统计目录总数
        let total = match self.count_directories(root, cancel)? {
            Some(total) => total,
            None => return Ok(None),
        };
        emit(ScanEvent::MaxProgress(total));

        let mut progress = ScanProgress {
            total_directories: total,
            ..Default::default()
        };

        // 第二遍：自底向上分类
        let results = match self.classify(root, cancel, &mut progress, emit)? {
            Some(results) => results,
            None => return Ok(None),
        };

        emit(ScanEvent::Progress(progress.processed_directories));
        emit(ScanEvent::Status(format!(
            "扫描完成，共处理 {} 个目录",
            progress.processed_directories
        )));

        Ok(Some(results))
    }

    fn check_root(root: &Path) -> Result<(), ScanError> {
        let metadata = fs::metadata(root).map_err(|source| ScanError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        Ok(())
    }

    /// 自顶向下统计目录数量（含根目录，不跟随符号链接）
    ///
    /// 被取消时返回 `None`。
    fn count_directories(&self, root: &Path, cancel: &CancellationToken) -> Result<Option<usize>, ScanError> {
        let mut total = 0usize;

        for entry in WalkDir::new(root).follow_links(false) {
            match entry {
                Ok(entry) => {
                    // 根目录可能是指向目录的符号链接，已由 check_root 确认
                    if !entry.file_type().is_dir() && entry.depth() > 0 {
                        continue;
                    }
                    if cancel.is_cancelled() {
                        return Ok(None);
                    }
                    total += 1;
                }
                Err(err) if err.depth() == 0 => return Err(Self::root_error(root, err)),
                Err(err) => {
                    tracing::debug!("预扫描时跳过: {}", err);
                }
            }
        }

        Ok(Some(total))
    }

    /// 后序遍历目录树，子目录总在父目录之前处理（不跟随符号链接）
    fn classify<F>(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        progress: &mut ScanProgress,
        emit: &mut F,
    ) -> Result<Option<Vec<EmptyFolderRecord>>, ScanError>
    where
        F: FnMut(ScanEvent),
    {
        let mut results = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .contents_first(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(Self::root_error(root, err)),
                Err(err) => {
                    // 无法打开的目录本身随后仍会出现一次，在那里计数
                    tracing::debug!("遍历时跳过: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_dir() && entry.depth() > 0 {
                continue;
            }
            if cancel.is_cancelled() {
                return Ok(None);
            }

            let dir = entry.into_path();
            match inspect(&dir, &self.classifier) {
                Ok(snapshot) => {
                    if snapshot.is_effectively_empty() {
                        tracing::debug!("发现空文件夹: {}", dir.display());
                        results.push(EmptyFolderRecord::new(dir.clone()));
                    }
                }
                Err(source) if dir == root => {
                    return Err(ScanError::RootUnavailable { path: dir, source });
                }
                Err(err) => {
                    tracing::warn!("跳过无法读取的目录: {}: {}", dir.display(), err);
                }
            }

            self.record_processed(dir, progress, emit);
        }

        Ok(Some(results))
    }

    fn root_error(root: &Path, err: walkdir::Error) -> ScanError {
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));
        ScanError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        }
    }

    fn record_processed<F>(&self, dir: PathBuf, progress: &mut ScanProgress, emit: &mut F)
    where
        F: FnMut(ScanEvent),
    {
        progress.processed_directories += 1;
        let current = progress.current_path.insert(dir);

        if progress.processed_directories % self.batch_size == 0 {
            emit(ScanEvent::Progress(progress.processed_directories));
            emit(ScanEvent::Status(format!("正在扫描:\n{}", current.display())));
            tracing::debug!(
                "[{}/{}] 正在扫描: {}",
                progress.processed_directories,
                progress.total_directories,
                current.display()
            );
        }
    }
}
