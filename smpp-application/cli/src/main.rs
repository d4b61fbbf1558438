//! SMPP 批处理 CLI
//!
//! 用法: `smpp-batch <script> <transcript>`

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use smpp_executor::{
    BatchRunner, EventLog, HarnessConfig, PauseInterrupt, RunOutcome, RunReport, ScriptCompiler,
};

#[derive(Parser)]
#[command(name = "smpp-batch")]
#[command(about = "SMPP 批处理测试工具 - 按脚本驱动对端并记录全部收发", long_about = None)]
#[command(version)]
struct Cli {
    /// 批处理脚本 (XML)
    script: PathBuf,

    /// 运行记录输出文件
    transcript: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志 (输出到 stderr，不与运行记录混在一起)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("SMPP 批处理工具启动");
    smpp_protocol::catalog::init();

    let config = HarnessConfig::load(cli.config.as_deref())?;
    config.validate()?;
    debug!("缺省对端: {}:{}", config.server.host, config.server.port);

    // 编译失败时不执行，也不生成运行记录
    let compiler = ScriptCompiler::new(config.compile_defaults());
    let batch = match compiler.compile_file(&cli.script) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Error reading batch. Batch not run.");
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    info!("脚本编译完成: {} 个事件", batch.len());

    let log = Arc::new(
        EventLog::create(&cli.transcript)
            .with_context(|| format!("Failed to create transcript: {:?}", cli.transcript))?
            .with_console_echo(config.transcript.echo_console),
    );

    let interrupt = PauseInterrupt::new();
    let runner =
        BatchRunner::tcp(&config, Arc::clone(&log))?.with_pause_interrupt(interrupt.clone());
    spawn_interrupt_listener(interrupt, log);

    let report = runner.run(&batch).await;
    print_summary(&report, &cli);

    if !report.is_completed() {
        process::exit(1);
    }

    Ok(())
}

/// Ctrl-C 处理
///
/// 第一次落在暂停中的 Ctrl-C 只结束这次暂停；暂停之外或再次按下则关闭运行记录并退出。
fn spawn_interrupt_listener(interrupt: PauseInterrupt, log: Arc<EventLog>) {
    tokio::spawn(async move {
        let mut cut_short = false;
        while tokio::signal::ctrl_c().await.is_ok() {
            if !should_exit_on_ctrl_c(&interrupt, &mut cut_short) {
                info!("收到中断信号，结束当前暂停");
                continue;
            }

            warn!("收到中断信号，终止批处理");
            log.close();
            eprintln!("Interrupted. Batch stopped.");
            process::exit(130);
        }
    });
}

fn should_exit_on_ctrl_c(interrupt: &PauseInterrupt, cut_short: &mut bool) -> bool {
    if *cut_short || !interrupt.interrupt() {
        return true;
    }
    *cut_short = true;
    false
}

fn print_summary(report: &RunReport, cli: &Cli) {
    println!();
    match &report.outcome {
        RunOutcome::Completed => {
            println!("{} 批处理执行完成", "✓".green().bold());
        }
        RunOutcome::Aborted { reason } => {
            println!("{} 批处理中止: {}", "✗".red().bold(), reason.red());
        }
    }
    println!("  事件数: {}", report.events_processed.to_string().yellow());
    println!("  结束序号: {}", report.final_sequence.to_string().yellow());
    println!("  耗时: {} ms", report.duration_ms.to_string().yellow());
    println!("  运行记录: {}", cli.transcript.display().to_string().bright_black());
}
