use anyhow::Result;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::models::{TrashLedger, TrashRejection, TrashResult};
use crate::scanner::{inspect, PathClassifier};

/// 把文件夹移动到回收站的底层能力
pub trait TrashBackend {
    fn move_to_trash(&self, path: &Path) -> Result<()>;
}

/// 使用 trash crate 移动到系统回收站
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl TrashBackend for SystemTrash {
    fn move_to_trash(&self, path: &Path) -> Result<()> {
        trash::delete(path).map_err(|e| anyhow::anyhow!("无法移动到回收站: {}", e))
    }
}

/// 回收站操作 - 移动前重新检查每个文件夹是否仍然存在且仍然为空
///
/// 单个路径失败不会影响其余路径，台账与输入一一对应。不做任何重试。
pub struct TrashOperation<B = SystemTrash> {
    classifier: Arc<PathClassifier>,
    backend: B,
}

impl TrashOperation<SystemTrash> {
    pub fn new(classifier: Arc<PathClassifier>) -> Self {
        Self::with_backend(classifier, SystemTrash)
    }
}

impl<B: TrashBackend> TrashOperation<B> {
    pub fn with_backend(classifier: Arc<PathClassifier>, backend: B) -> Self {
        Self { classifier, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 逐个复核并移动到回收站
    pub fn move_to_trash<P: AsRef<Path>>(&self, paths: &[P]) -> TrashLedger {
        let mut ledger = TrashLedger::new();

        for path in paths {
            let path = path.as_ref();
            let result = match self.verify(path).and_then(|()| self.execute(path)) {
                Ok(()) => {
                    tracing::info!("已移动到回收站: {}", path.display());
                    TrashResult::Moved
                }
                Err(reason) => {
                    tracing::warn!("未移动 {}: {}", path.display(), reason);
                    TrashResult::Rejected(reason)
                }
            };
            ledger.record(path, result);
        }

        ledger
    }

    /// 根据最新的目录快照确认文件夹仍然可以移动
    pub fn verify(&self, path: &Path) -> Result<(), TrashRejection> {
        if let Err(err) = fs::metadata(path) {
            return Err(Self::rejection_for(err));
        }

        let snapshot = inspect(path, &self.classifier).map_err(Self::rejection_for)?;
        if !snapshot.has_only_ignored_entries() {
            return Err(TrashRejection::NoLongerEmpty);
        }

        Ok(())
    }

    fn execute(&self, path: &Path) -> Result<(), TrashRejection> {
        self.backend
            .move_to_trash(path)
            .map_err(|e| TrashRejection::MoveFailed(format!("{:#}", e)))
    }

    fn rejection_for(err: io::Error) -> TrashRejection {
        if err.kind() == io::ErrorKind::NotFound {
            TrashRejection::NotFound
        } else {
            TrashRejection::Unreadable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IgnoreSet;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// 直接删除目录并记录调用的测试后端
    #[derive(Default)]
    struct RemovingBackend {
        calls: Mutex<Vec<PathBuf>>,
    }

    impl TrashBackend for RemovingBackend {
        fn move_to_trash(&self, path: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            fs::remove_dir_all(path)?;
            Ok(())
        }
    }

    struct FailingBackend;

    impl TrashBackend for FailingBackend {
        fn move_to_trash(&self, _path: &Path) -> Result<()> {
            anyhow::bail!("回收站不可用")
        }
    }

    fn classifier() -> Arc<PathClassifier> {
        Arc::new(PathClassifier::new(IgnoreSet::new([".DS_Store"])))
    }

    #[test]
    fn test_moves_empty_and_rejects_missing() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a");
        let missing = temp_dir.path().join("missing");
        fs::create_dir(&a).unwrap();

        let operation = TrashOperation::with_backend(classifier(), RemovingBackend::default());
        let ledger = operation.move_to_trash(&[a.clone(), missing.clone()]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].path, a);
        assert_eq!(ledger.entries()[0].result, TrashResult::Moved);
        assert_eq!(ledger.entries()[1].path, missing);
        assert_eq!(
            ledger.entries()[1].result,
            TrashResult::Rejected(TrashRejection::NotFound)
        );
        assert!(!a.exists());
    }

    #[test]
    fn test_folder_with_only_ignored_files_is_moved() {
        let temp_dir = tempdir().unwrap();
        let b = temp_dir.path().join("b");
        fs::create_dir(&b).unwrap();
        fs::write(b.join(".DS_Store"), "").unwrap();

        let operation = TrashOperation::with_backend(classifier(), RemovingBackend::default());
        let ledger = operation.move_to_trash(&[&b]);

        assert_eq!(ledger.moved_count(), 1);
    }

    #[test]
    fn test_changed_folder_is_not_moved() {
        let temp_dir = tempdir().unwrap();
        let changed = temp_dir.path().join("changed");
        let sibling = temp_dir.path().join("sibling");
        fs::create_dir(&changed).unwrap();
        fs::create_dir(&sibling).unwrap();
        fs::write(changed.join("new.txt"), "appeared after scan").unwrap();

        let operation = TrashOperation::with_backend(classifier(), RemovingBackend::default());
        let ledger = operation.move_to_trash(&[&changed, &sibling]);

        assert_eq!(
            ledger.entries()[0].result,
            TrashResult::Rejected(TrashRejection::NoLongerEmpty)
        );
        assert_eq!(ledger.entries()[1].result, TrashResult::Moved);
        assert!(changed.join("new.txt").exists());
        assert_eq!(*operation.backend().calls.lock().unwrap(), vec![sibling]);
    }

    #[test]
    fn test_new_subdirectory_makes_folder_non_empty() {
        let temp_dir = tempdir().unwrap();
        let folder = temp_dir.path().join("folder");
        fs::create_dir_all(folder.join("child")).unwrap();

        let operation = TrashOperation::with_backend(classifier(), RemovingBackend::default());

        assert_eq!(operation.verify(&folder), Err(TrashRejection::NoLongerEmpty));
    }

    #[test]
    fn test_backend_failure_is_recorded_per_item() {
        let temp_dir = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["x", "y", "z"]
            .iter()
            .map(|name| temp_dir.path().join(name))
            .collect();
        for path in &paths[..2] {
            fs::create_dir(path).unwrap();
        }

        let operation = TrashOperation::with_backend(classifier(), FailingBackend);
        let ledger = operation.move_to_trash(&paths);

        assert_eq!(ledger.len(), paths.len());
        for entry in &ledger.entries()[..2] {
            match &entry.result {
                TrashResult::Rejected(TrashRejection::MoveFailed(detail)) => {
                    assert!(detail.contains("回收站不可用"));
                }
                other => panic!("期望移动失败，实际: {:?}", other),
            }
        }
        assert_eq!(
            ledger.entries()[2].result,
            TrashResult::Rejected(TrashRejection::NotFound)
        );
    }

    #[test]
    fn test_file_path_is_unreadable() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let operation = TrashOperation::with_backend(classifier(), RemovingBackend::default());

        assert!(matches!(
            operation.verify(&file),
            Err(TrashRejection::Unreadable(_))
        ));
    }

    #[test]
    fn test_empty_input_gives_empty_ledger() {
        let operation = TrashOperation::with_backend(classifier(), FailingBackend);
        let ledger = operation.move_to_trash::<PathBuf>(&[]);
        assert!(ledger.is_empty());
    }
}
