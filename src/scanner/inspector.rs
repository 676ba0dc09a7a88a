use std::fs;
use std::io;
use std::path::Path;

use crate::models::DirectoryEntrySnapshot;
use crate::scanner::PathClassifier;

/// 读取目录的直接子项，生成最新的快照
///
/// 单个目录项出错时跳过该项；指向目录的符号链接计为子目录；
/// 失效的符号链接和无法识别类型的目录项计为文件。
pub fn inspect(path: &Path, classifier: &PathClassifier) -> io::Result<DirectoryEntrySnapshot> {
    let mut snapshot = DirectoryEntrySnapshot::new(path.to_path_buf());

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("读取目录项失败: {}: {}", path.display(), err);
                continue;
            }
        };

        let file_name = entry.file_name();
        let ignorable = classifier.is_ignorable(&file_name);
        let name = file_name.to_string_lossy().into_owned();

        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => snapshot.subdirectories.push(name, ignorable),
            Ok(file_type) if file_type.is_symlink() => {
                let points_to_dir = fs::metadata(entry.path())
                    .map(|meta| meta.is_dir())
                    .unwrap_or(false);
                if points_to_dir {
                    snapshot.subdirectories.push(name, ignorable);
                } else {
                    snapshot.files.push(name, ignorable);
                }
            }
            Ok(_) => snapshot.files.push(name, ignorable),
            Err(err) => {
                tracing::debug!("无法获取类型，按文件处理: {}: {}", entry.path().display(), err);
                snapshot.files.push(name, ignorable);
            }
        }
    }

    snapshot.subdirectories.sort();
    snapshot.files.sort();

    Ok(snapshot)
}
