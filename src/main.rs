use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{error, info, warn};

use dispatch_core::{init_logging, AppConfig};

mod app;
mod shutdown;

use app::Application;
use shutdown::{wait_for_shutdown_signal, ShutdownManager};

fn cli() -> Command {
    Command::new("dispatch-emulator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("任务派发看板的内存后端模拟服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时依次尝试 config/emulator.toml、emulator.toml"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("监听地址，覆盖配置文件"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"]),
        )
        .arg(
            Arg::new("no-seed")
                .long("no-seed")
                .help("以空集合启动，不载入演示数据")
                .action(ArgAction::SetTrue),
        )
}

/// 命令行参数覆盖配置文件
fn apply_overrides(config: &mut AppConfig, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.api.bind_address = bind.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.clone();
    }
    if matches.get_flag("no-seed") {
        config.emulator.seed_fixtures = false;
    }
    config.validate()
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config_path = matches.get_one::<String>("config").map(String::as_str);

    let mut config = AppConfig::load(config_path).context("加载配置失败")?;
    apply_overrides(&mut config, &matches)?;

    init_logging(&config.observability)?;

    info!(config = ?config_path, "Starting dispatch emulator");

    let app = Application::new(config);
    let shutdown_manager = ShutdownManager::new();

    let app_handle = {
        let shutdown_rx = shutdown_manager.subscribe();
        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("应用运行失败: {e:#}");
            }
        })
    };

    wait_for_shutdown_signal().await;
    info!("Shutting down");
    shutdown_manager.shutdown().await;

    match tokio::time::timeout(Duration::from_secs(10), app_handle).await {
        Ok(Ok(())) => info!("Emulator exited cleanly"),
        Ok(Err(e)) => error!("应用关闭时发生错误: {e}"),
        Err(_) => warn!("应用关闭超时，强制退出"),
    }

    Ok(())
}
