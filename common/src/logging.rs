use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// 命令结果走stdout，日志一律走stderr，避免污染可被管道处理的输出。
/// 默认级别warn，可通过RUST_LOG环境变量覆盖。
pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // 初始化日志订阅器
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    Ok(())
}
