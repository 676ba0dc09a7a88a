use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};

use crate::config::defaults::DefaultConfig;
use crate::models::IgnoreSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 忽略配置
    pub ignore: IgnoreConfig,

    /// 扫描配置
    pub scan: ScanConfig,

    /// 显示配置
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IgnoreConfig {
    /// 判断文件夹是否为空时视为不存在的文件名（区分大小写）
    pub names: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// 每处理多少个目录发送一次进度事件
    pub progress_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// 轮询扫描事件的间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: IgnoreConfig::default(),
            scan: ScanConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            names: DefaultConfig::default_ignored_names(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            progress_batch_size: DefaultConfig::default_progress_batch_size(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DefaultConfig::default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("无法写入配置文件: {}", path.display()))?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push("void-finder");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，如果文件不存在则创建默认配置
    pub fn load_or_create_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            tracing::info!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 根据配置构建忽略集合，进程启动后只读
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(self.ignore.names.iter().cloned())
    }

    /// 进度批次大小，至少为 1
    pub fn progress_batch_size(&self) -> usize {
        self.scan.progress_batch_size.max(1)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.display.poll_interval_ms.max(1))
    }
}
