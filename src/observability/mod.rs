//! 可观测性：tracing 订阅器
//!
//! 日志写到 stderr，stdout 只留给命令结果。默认 info，可通过 RUST_LOG 覆盖。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
