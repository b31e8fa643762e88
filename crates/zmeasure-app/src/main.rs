//! ZCAD 测量脚本回放入口
//!
//! 用法: zmeasure <script.json> [config.json]

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zmeasure_app::{run_script, Script};
use zmeasure_tools::config::MeasureConfig;

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish(),
    )?;

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        bail!("usage: zmeasure <script.json> [config.json]");
    };

    let mut script = Script::from_path(&script_path)?;
    if let Some(config_path) = args.next().map(PathBuf::from) {
        script.config = MeasureConfig::from_path(&config_path)?;
        info!("使用配置文件: {}", config_path.display());
    }

    info!(
        "回放脚本 {}: {} 个图元, {} 个事件",
        script_path.display(),
        script.entities.len(),
        script.events.len()
    );

    let report = run_script(&script);
    for m in &report.measurements {
        info!("{} {}: {}", m.id, m.kind.name(), m.label);
    }
    info!(
        "共完成 {} 次测量，{} 个步骤被拒绝",
        report.measurements.len(),
        report.rejected
    );

    println!("{}", serde_json::to_string_pretty(&report.measurements)?);
    Ok(())
}
