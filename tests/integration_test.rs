use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

use void_finder::config::Config;
use void_finder::models::{IgnoreSet, ScanEvent, ScanOutcome, TrashRejection, TrashResult};
use void_finder::operations::{TrashBackend, TrashOperation};
use void_finder::scanner::{inspect, PathClassifier, ScanController, ScanEngine, SizeCalculator};

/// 直接删除目录的测试后端，避免触碰真实的回收站
struct RemoveDirBackend;

impl TrashBackend for RemoveDirBackend {
    fn move_to_trash(&self, path: &Path) -> anyhow::Result<()> {
        fs::remove_dir_all(path)?;
        Ok(())
    }
}

fn ds_store_classifier() -> Arc<PathClassifier> {
    Arc::new(PathClassifier::new(IgnoreSet::new([".DS_Store"])))
}

// 创建 root/{a/, b/{.DS_Store}, c/{file.txt}}
fn create_sample_tree(root: &Path) {
    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir(root.join("b")).unwrap();
    fs::write(root.join("b").join(".DS_Store"), "").unwrap();
    fs::create_dir(root.join("c")).unwrap();
    fs::write(root.join("c").join("file.txt"), "content").unwrap();
}

fn paths_of(outcome: ScanOutcome) -> HashSet<PathBuf> {
    outcome
        .into_results()
        .expect("扫描应当完成")
        .into_iter()
        .map(|record| record.path)
        .collect()
}

#[tokio::test]
async fn test_scan_finds_folders_with_only_ignored_files() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    create_sample_tree(root);

    let controller = ScanController::new(ScanEngine::new(ds_store_classifier()));
    let outcome = controller.start(root).outcome().await;

    let expected: HashSet<PathBuf> = [root.join("a"), root.join("b")].into_iter().collect();
    assert_eq!(paths_of(outcome), expected);
}

#[tokio::test]
async fn test_event_stream_shape() {
    let temp_dir = tempdir().unwrap();
    create_sample_tree(temp_dir.path());

    let controller = ScanController::new(ScanEngine::new(ds_store_classifier()).with_batch_size(1));
    let mut handle = controller.start(temp_dir.path());

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    let max_positions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ScanEvent::MaxProgress(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(max_positions.len(), 1);

    // 进度事件只出现在 MaxProgress 之后
    let first_progress = events
        .iter()
        .position(|e| matches!(e, ScanEvent::Progress(_)))
        .unwrap();
    assert!(first_progress > max_positions[0]);

    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(events.last().unwrap().is_terminal());
}

#[tokio::test]
async fn test_cancel_before_counting_finishes() {
    let temp_dir = tempdir().unwrap();
    create_sample_tree(temp_dir.path());

    let controller = ScanController::from_config(&Config::default());
    let mut handle = controller.start(temp_dir.path());
    controller.cancel(&handle);

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    assert_eq!(events, vec![ScanEvent::Finished(ScanOutcome::Cancelled)]);
}

#[tokio::test]
async fn test_scan_of_missing_root_fails_instead_of_reporting_nothing() {
    let temp_dir = tempdir().unwrap();

    let controller = ScanController::from_config(&Config::default());
    let outcome = controller.start(temp_dir.path().join("missing")).outcome().await;

    assert!(matches!(outcome, ScanOutcome::Failed(_)));
}

#[tokio::test]
async fn test_scan_then_trash_then_rescan() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    create_sample_tree(root);

    let controller = ScanController::new(ScanEngine::new(ds_store_classifier()));
    let mut first: Vec<PathBuf> = paths_of(controller.start(root).outcome().await)
        .into_iter()
        .collect();
    first.sort();

    // 扫描之后 b 中出现了新文件
    fs::write(root.join("b").join("new.txt"), "late").unwrap();

    let operation = TrashOperation::with_backend(ds_store_classifier(), RemoveDirBackend);
    let ledger = operation.move_to_trash(&first);

    assert_eq!(ledger.len(), first.len());
    assert_eq!(ledger.entries()[0].path, root.join("a"));
    assert_eq!(ledger.entries()[0].result, TrashResult::Moved);
    assert_eq!(
        ledger.entries()[1].result,
        TrashResult::Rejected(TrashRejection::NoLongerEmpty)
    );

    let rescan = controller.start(root).outcome().await;
    assert!(paths_of(rescan).is_empty());
}

#[test]
fn test_trash_ledger_for_missing_path() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("a")).unwrap();

    let operation = TrashOperation::with_backend(ds_store_classifier(), RemoveDirBackend);
    let ledger = operation.move_to_trash(&[root.join("a"), root.join("missing")]);

    let results: Vec<&TrashResult> = ledger.entries().iter().map(|e| &e.result).collect();
    assert_eq!(
        results,
        vec![
            &TrashResult::Moved,
            &TrashResult::Rejected(TrashRejection::NotFound)
        ]
    );
    assert!(ledger.summary_report().contains("移动失败 1 个文件夹"));
}

#[test]
fn test_inspect_reports_ignored_items() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    create_sample_tree(root);

    let classifier = PathClassifier::new(IgnoreSet::default());
    let snapshot = inspect(&root.join("b"), &classifier).unwrap();

    assert!(snapshot.is_effectively_empty());
    assert_eq!(snapshot.ignored_names(), vec![".DS_Store"]);

    let snapshot = inspect(&root.join("c"), &classifier).unwrap();
    assert!(!snapshot.is_effectively_empty());
    assert_eq!(snapshot.files.significant, vec!["file.txt"]);
}

#[cfg(unix)]
#[test]
fn test_size_ignores_broken_symlink() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("payload.bin"), vec![7u8; 2048]).unwrap();
    std::os::unix::fs::symlink(dir.join("does-not-exist"), dir.join("broken")).unwrap();

    assert_eq!(SizeCalculator::new().total_size(dir), 2048);
}
