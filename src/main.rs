mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use void_finder::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，默认 INFO，--verbose 时为 DEBUG；输出到 stderr 以免混入结果
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置
    let (config, config_path) = match cli.config {
        Some(path) => (Config::load_from_file(&path)?, path),
        None => (Config::load_or_create_default()?, Config::default_config_path()?),
    };

    // 根据命令执行相应操作
    match cli.command {
        Commands::Scan { root, format, output } => {
            commands::scan(&config, root, format, output).await?;
        }
        Commands::Inspect { path } => {
            commands::inspect_folder(&config, path).await?;
        }
        Commands::Size { path } => {
            commands::size(path).await?;
        }
        Commands::Trash { paths, force } => {
            commands::trash(&config, paths, force).await?;
        }
        Commands::Clean { root, force } => {
            commands::clean(&config, root, force).await?;
        }
        Commands::Config { action } => {
            commands::config_command(&config, &config_path, action)?;
        }
    }

    Ok(())
}
