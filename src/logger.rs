//! # 日志模块
//!
//! 基于 `tracing-subscriber` 的日志初始化。日志写往 stderr，
//! 级别只由命令行的 `-v` 次数决定。

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// 将 `-v` 出现的次数映射为过滤级别。
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// 安装全局订阅者。重复调用时静默忽略。
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::new(format!("pixel_hide={}", level_for(verbosity)));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
