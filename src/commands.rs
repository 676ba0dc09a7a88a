use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use void_finder::config::Config;
use void_finder::models::{sort_records, EmptyFolderRecord, ScanEvent, ScanOutcome, ScanReport, TrashLedger};
use void_finder::operations::TrashOperation;
use void_finder::scanner::{inspect, PathClassifier, ScanController, SizeCalculator};
use void_finder::utils::{format_duration, format_size, format_time};

use crate::cli::{ConfigAction, OutputFormat};

/// 一次扫描在前端看到的结果
struct ScanSummary {
    outcome: ScanOutcome,
    total_directories: usize,
    started_at: DateTime<Utc>,
    elapsed: Duration,
}

/// 扫描并输出空文件夹列表
pub async fn scan(config: &Config, root: PathBuf, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let controller = ScanController::from_config(config);
    let summary = scan_with_progress(&controller, &root, config.poll_interval()).await;

    let results = match summary.outcome {
        ScanOutcome::Completed(results) => results,
        ScanOutcome::Cancelled => {
            println!("{}", ScanOutcome::Cancelled);
            return Ok(());
        }
        failed @ ScanOutcome::Failed(_) => {
            anyhow::bail!("{}（扫描结果不完整，请勿当作没有空文件夹）", failed);
        }
    };

    let report = ScanReport::new(
        root,
        summary.started_at,
        summary.elapsed,
        summary.total_directories,
        results,
    );

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => render_table(&report),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", rendered))
                .with_context(|| format!("无法写入结果文件: {}", path.display()))?;
            println!("结果已保存到 {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// 显示文件夹的当前状态
pub async fn inspect_folder(config: &Config, path: PathBuf) -> Result<()> {
    let classifier = PathClassifier::new(config.ignore_set());

    println!("文件夹:\n{}\n", path.display());

    if !path.exists() {
        println!("状态: 不存在");
        return Ok(());
    }

    match inspect(&path, &classifier) {
        Ok(snapshot) => {
            let status = if snapshot.has_only_ignored_entries() { "空" } else { "非空!" };
            let size = SizeCalculator::new().calculate_directory_size(&path).await;

            println!("状态: {}", status);
            println!("大小: {}", format_size(size.size));

            let ignored = snapshot.ignored_names();
            if !ignored.is_empty() {
                println!("\n包含被忽略的文件: {}", ignored.join(", "));
            }
            if !snapshot.subdirectories.significant.is_empty() || !snapshot.files.significant.is_empty() {
                println!(
                    "子目录: {} 个，有效文件: {} 个",
                    snapshot.subdirectories.count(),
                    snapshot.files.significant.len()
                );
            }
        }
        Err(err) => println!("状态: 检查出错: {}", err),
    }

    Ok(())
}

/// 输出文件夹大小
pub async fn size(path: PathBuf) -> Result<()> {
    let info = SizeCalculator::new().calculate_directory_size(&path).await;
    println!(
        "{} ({} bytes, {} 个文件)\t{}",
        format_size(info.size),
        info.size,
        info.file_count,
        path.display()
    );
    Ok(())
}

/// 复核后移动到回收站
pub async fn trash(config: &Config, paths: Vec<PathBuf>, force: bool) -> Result<()> {
    let prompt = format!("确定要将 {} 个文件夹移动到回收站吗？", paths.len());
    if !force && !confirm(&prompt)? {
        println!("操作已取消");
        return Ok(());
    }

    let ledger = move_to_trash(config, paths).await?;
    println!("{}", ledger.summary_report());
    Ok(())
}

/// 扫描、确认、移动，然后重新扫描
pub async fn clean(config: &Config, root: PathBuf, force: bool) -> Result<()> {
    let controller = ScanController::from_config(config);
    let summary = scan_with_progress(&controller, &root, config.poll_interval()).await;

    let mut results = match summary.outcome {
        ScanOutcome::Completed(results) => results,
        ScanOutcome::Cancelled => {
            println!("{}", ScanOutcome::Cancelled);
            return Ok(());
        }
        failed @ ScanOutcome::Failed(_) => anyhow::bail!("{}", failed),
    };

    if results.is_empty() {
        println!("{}", ScanOutcome::Completed(results));
        return Ok(());
    }

    sort_records(&mut results);
    for record in &results {
        println!("{}", record);
    }

    let prompt = format!("确定要将 {} 个文件夹移动到回收站吗？", results.len());
    if !force && !confirm(&prompt)? {
        println!("操作已取消");
        return Ok(());
    }

    let paths: Vec<PathBuf> = results.into_iter().map(|record| record.path).collect();
    let ledger = move_to_trash(config, paths).await?;
    println!("{}", ledger.summary_report());

    // 移动之后刷新结果
    println!("\n正在重新扫描 {} ...", root.display());
    let rescan = scan_with_progress(&controller, &root, config.poll_interval()).await;
    println!("{}", rescan.outcome);

    Ok(())
}

/// 配置管理
pub fn config_command(config: &Config, config_path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Reset => {
            Config::default().save_to_file(config_path)?;
            println!("已重置配置: {}", config_path.display());
        }
        ConfigAction::Ignore { name } => {
            let mut updated = config.clone();
            if updated.ignore.names.insert(name.clone()) {
                updated.save_to_file(config_path)?;
                println!("已添加忽略文件名: {}", name);
            } else {
                println!("忽略文件名已存在: {}", name);
            }
        }
        ConfigAction::Unignore { name } => {
            let mut updated = config.clone();
            if updated.ignore.names.remove(&name) {
                updated.save_to_file(config_path)?;
                println!("已移除忽略文件名: {}", name);
            } else {
                println!("忽略文件名不存在: {}", name);
            }
        }
    }

    Ok(())
}

/// 启动扫描，并按固定间隔读取事件更新进度条；Ctrl+C 取消扫描
async fn scan_with_progress(controller: &ScanController, root: &Path, poll_interval: Duration) -> ScanSummary {
    let started_at = Utc::now();
    let timer = Instant::now();
    let progress = create_progress_bar();

    let mut handle = controller.start(root);
    let mut ticker = tokio::time::interval(poll_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_requested = false;
    let mut total_directories = 0usize;

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c, if !cancel_requested => {
                cancel_requested = true;
                handle.cancel();
                progress.set_message("正在取消扫描...");
            }
            _ = ticker.tick() => {}
        }

        let mut finished = None;
        while let Some(event) = handle.try_next_event() {
            match event {
                ScanEvent::Status(text) => progress.set_message(text.replace('\n', " ")),
                ScanEvent::MaxProgress(total) => {
                    total_directories = total;
                    progress.set_length(total.max(1) as u64);
                }
                ScanEvent::Progress(count) => progress.set_position(count as u64),
                ScanEvent::Finished(outcome) => finished = Some(outcome),
            }
        }

        if let Some(outcome) = finished {
            break outcome;
        }
    };

    progress.finish_and_clear();

    let elapsed = timer.elapsed();
    tracing::info!(
        "扫描结束 ({}，开始于 {}): {}",
        format_duration(elapsed),
        format_time(started_at),
        outcome
    );

    ScanSummary {
        outcome,
        total_directories,
        started_at,
        elapsed,
    }
}

async fn move_to_trash(config: &Config, paths: Vec<PathBuf>) -> Result<TrashLedger> {
    let classifier = Arc::new(PathClassifier::new(config.ignore_set()));
    let operation = TrashOperation::new(classifier);

    let ledger = tokio::task::spawn_blocking(move || operation.move_to_trash(&paths))
        .await
        .context("移动到回收站的任务失败")?;

    tracing::info!(
        "移动完成: 成功 {} 个，失败 {} 个",
        ledger.moved_count(),
        ledger.rejected_count()
    );
    Ok(ledger)
}

/// 创建进度条
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn render_table(report: &ScanReport) -> String {
    let mut lines: Vec<String> = report.empty_folders.iter().map(EmptyFolderRecord::to_string).collect();
    let outcome = ScanOutcome::Completed(report.empty_folders.clone());
    lines.push(format!(
        "{} (扫描 {} 个目录，用时 {})",
        outcome,
        report.total_directories,
        format_duration(report.duration())
    ));
    lines.join("\n")
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/N) ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}
