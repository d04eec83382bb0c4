//! 扫描评审演示程序
//!
//! 加载配置，依次让已分配医生登录并提交评审，最后输出进度、最终汇总和审计日志

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use review_admin::{build_store, ConfigManager, FinalSummary, ReviewConfig, ScanProgress};
use review_core::ReviewFields;
use review_workflow::{AuditQuery, ExportFormat, ReviewStore};
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "scan-review")]
#[command(about = "单扫描多医生盲评工作流演示")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别，未指定时使用配置中的级别
    #[arg(short, long)]
    log_level: Option<String>,

    /// 审计日志输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Text,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Text => ExportFormat::Text,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let manager = ConfigManager::new(args.config.as_deref())?;
    let config = manager.get_config().await;

    // 初始化日志
    let filter = args.log_level.as_deref().unwrap_or(&config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.logging.with_target)
        .init();

    info!("启动扫描评审演示...");

    let mut store = build_store(&config)?;
    run_walkthrough(&mut store, &config)?;

    let progress = ScanProgress::from_store(&store);
    println!("== Progress ==");
    println!(
        "{}: {} / {} locked, {} ({})",
        progress.scan_id,
        progress.locked_count,
        progress.assigned_count,
        progress.stage,
        progress.next_step
    );

    let summary = FinalSummary::from_store(&store);
    println!("== Final summary ==");
    println!("{}", summary.agreement.summary());
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to render final summary")?
    );

    println!("== Audit log ==");
    let exported = store
        .audit_log()
        .export(&AuditQuery::all(), args.format.into())
        .context("Failed to export audit log")?;
    print!("{}", exported);

    Ok(())
}

/// 管理员分配医生，各医生登录后保存草稿并提交
fn run_walkthrough(store: &mut ReviewStore, config: &ReviewConfig) -> Result<()> {
    store
        .authenticate(&config.admin.email, &config.admin.password)
        .context("Admin credentials rejected")?;

    let assigned = store
        .set_assignments(config.scan.initial_assignment.clone())
        .context("Failed to assign doctors")?;
    info!("管理员分配医生: {:?}", assigned);

    for doctor_id in &assigned {
        let Some(seed) = config.seed_doctors.iter().find(|d| &d.id == doctor_id) else {
            warn!("Doctor {} has no seed credentials, skipping", doctor_id);
            continue;
        };

        store
            .login(&seed.email, &seed.password)
            .with_context(|| format!("Doctor {} failed to log in", doctor_id))?;
        store.open_review(doctor_id)?;

        let draft = ReviewFields::new("Acne Vulgaris", "", "Initial impression");
        store.save_draft(doctor_id, draft)?;

        let fields = ReviewFields::new(
            "Acne Vulgaris",
            "High",
            format!("Reviewed by {}", seed.name),
        );
        fields.validate_for_submit()?;
        let review = store.submit_review(doctor_id, fields)?;
        info!("医生 {} 提交评审: {}", doctor_id, review.status);

        store.logout();
    }

    match store.final_result() {
        Some(result) => info!("最终结果已锁定: {}", result),
        None => warn!("Final result not available yet"),
    }
    Ok(())
}
