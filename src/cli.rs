use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "void-finder")]
#[command(about = "查找并清理只包含系统生成文件的空文件夹")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 扫描指定目录中的空文件夹
    Scan {
        /// 要扫描的根目录
        #[arg(default_value = ".")]
        root: PathBuf,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// 保存结果到文件
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 查看文件夹的当前状态
    Inspect {
        /// 文件夹路径
        path: PathBuf,
    },

    /// 计算文件夹大小
    Size {
        /// 文件夹路径
        path: PathBuf,
    },

    /// 复核后将文件夹移动到回收站
    Trash {
        /// 要移动的文件夹
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 强制执行，不询问确认
        #[arg(short, long)]
        force: bool,
    },

    /// 扫描后将所有空文件夹移动到回收站，并重新扫描
    Clean {
        /// 要扫描的根目录
        #[arg(default_value = ".")]
        root: PathBuf,

        /// 强制执行，不询问确认
        #[arg(short, long)]
        force: bool,
    },

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 显示配置文件路径
    Path,

    /// 重置为默认配置
    Reset,

    /// 添加忽略的文件名
    Ignore {
        /// 文件名（区分大小写）
        name: String,
    },

    /// 移除忽略的文件名
    Unignore {
        /// 文件名（区分大小写）
        name: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 每行一个路径
    Table,
    /// JSON 格式
    Json,
}
