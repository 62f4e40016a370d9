//! HugTime 命令行程序

mod display;
mod settings;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use hugtime_catalog::{find_procedure, FamilyMemberInput, FamilyRoster};
use hugtime_core::{DoseStandard, NuclideId, PatientDose};
use hugtime_engine::{ExposureEvaluator, IntakeValidator};
use settings::HugTimeConfig;
use std::time::Duration;
use tracing::{info, warn};

/// HugTime 命令行参数
#[derive(Parser, Debug)]
#[command(name = "hugtime")]
#[command(about = "核医学检查后与家属安全接触时间估算")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别 (覆盖配置文件)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 计算每位家属在各接触场景下的安全倒计时
    Evaluate(EvaluateArgs),
    /// 列出核素、诊疗项目、剂量限值和接触场景
    Catalog,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// 放射性核素 (如 I-131, Tc-99m)
    #[arg(long)]
    nuclide: Option<String>,

    /// 诊疗项目ID (如 i131-ablation)
    #[arg(long)]
    procedure: Option<String>,

    /// 给药量 (MBq)
    #[arg(long)]
    dose: Option<f64>,

    /// 注射时间 (RFC 3339，或本地时间 YYYY-MM-DD HH:MM)
    #[arg(long)]
    injected_at: Option<String>,

    /// 家属，格式为 称呼:年龄[:pregnant]，可重复
    #[arg(short, long = "member")]
    members: Vec<String>,

    /// 剂量标准 (icrp / korean)
    #[arg(short, long)]
    standard: Option<String>,

    /// 按固定间隔持续刷新倒计时
    #[arg(short, long)]
    watch: bool,

    /// 以 JSON 输出
    #[arg(long)]
    json: bool,
}

/// 一次会话的全部输入
struct Session {
    dose: PatientDose,
    roster: FamilyRoster,
    standard: DoseStandard,
    evaluator: ExposureEvaluator,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = settings::load_config(cli.config.as_deref())?;

    // 初始化日志
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Catalog => {
            print!("{}", display::render_catalog()?);
            Ok(())
        }
        Command::Evaluate(args) => run_evaluate(args, &config).await,
    }
}

async fn run_evaluate(args: EvaluateArgs, config: &HugTimeConfig) -> Result<()> {
    let session = build_session(&args, config)?;
    info!(
        "评估 {} 位家属，剂量标准 {}",
        session.roster.len(),
        session.standard
    );

    if !args.watch {
        return render_once(&session, args.json);
    }

    let mut interval = tokio::time::interval(Duration::from_secs(config.watch.tick_interval_secs));
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("收到中断信号，停止刷新");
                return Ok(());
            }
        }

        let report = session.evaluator.evaluate(
            &session.dose,
            session.roster.members(),
            session.standard,
            Utc::now(),
        )?;
        print_report(&report, &session.roster, args.json)?;
        ticks += 1;

        if report.members.iter().all(|m| m.all_safe()) {
            println!("🎉 所有家属在所有场景下都已安全");
            return Ok(());
        }
        if config.watch.max_ticks.is_some_and(|max| ticks >= max) {
            return Ok(());
        }
    }
}

fn render_once(session: &Session, json: bool) -> Result<()> {
    let report = session.evaluator.evaluate(
        &session.dose,
        session.roster.members(),
        session.standard,
        Utc::now(),
    )?;
    print_report(&report, &session.roster, json)
}

fn print_report(
    report: &hugtime_core::ExposureReport,
    roster: &FamilyRoster,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", display::render_report(report, roster)?);
    }
    Ok(())
}

/// 合并命令行参数和配置文件，校验后组装会话
fn build_session(args: &EvaluateArgs, config: &HugTimeConfig) -> Result<Session> {
    let mut dose = config.patient.dose.clone();

    if let Some(nuclide) = &args.nuclide {
        dose.nuclide_id = Some(nuclide.parse::<NuclideId>()?);
    }
    if let Some(procedure_id) = &args.procedure {
        dose.procedure_id = Some(procedure_id.clone());
    }
    if dose.nuclide_id.is_none() {
        dose.nuclide_id = dose
            .procedure_id
            .as_deref()
            .and_then(find_procedure)
            .map(|p| p.nuclide_id);
    }
    if let Some(mbq) = args.dose {
        dose.dose_mbq = Some(mbq);
    }
    if let Some(raw) = &args.injected_at {
        dose.injection_time = Some(parse_injection_time(raw)?);
    }

    let standard = match &args.standard {
        Some(raw) => raw.parse::<DoseStandard>()?,
        None => config.evaluator.default_standard,
    };

    let inputs = if args.members.is_empty() {
        config.family.clone()
    } else {
        args.members
            .iter()
            .map(|raw| parse_member(raw))
            .collect::<Result<Vec<_>>>()?
    };

    let validator = IntakeValidator::new();
    let now = Utc::now();
    let mut validation = match &config.patient.profile {
        Some(profile) => validator.validate_patient(profile, &dose, now),
        None => validator.validate_dose(&dose, now),
    };
    validation.merge(validator.validate_family(&inputs));

    for warning in &validation.warnings {
        warn!("{}: {}", warning.field, warning.message);
    }
    if !validation.is_valid {
        for issue in &validation.errors {
            eprintln!("❌ {}: {}", issue.field, issue.message);
        }
        bail!("{}", validation.get_summary());
    }

    Ok(Session {
        dose,
        roster: FamilyRoster::from_inputs(&inputs, standard),
        standard,
        evaluator: ExposureEvaluator::new()
            .with_casual_occupancy_factor(config.evaluator.casual_occupancy_factor),
    })
}

/// 解析 `称呼:年龄[:pregnant]`
fn parse_member(raw: &str) -> Result<FamilyMemberInput> {
    let mut parts = raw.split(':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let age = parts
        .next()
        .with_context(|| format!("缺少年龄: {}", raw))?
        .parse::<u32>()
        .with_context(|| format!("年龄无效: {}", raw))?;
    let is_pregnant = match parts.next() {
        None => false,
        Some(flag) if matches!(flag.to_ascii_lowercase().as_str(), "pregnant" | "p" | "true") => {
            true
        }
        Some(flag) => bail!("未知标记 {}: {}", flag, raw),
    };
    if parts.next().is_some() {
        bail!("家属格式应为 称呼:年龄[:pregnant]: {}", raw);
    }

    Ok(FamilyMemberInput {
        name: name.to_string(),
        age,
        is_pregnant,
    })
}

/// 解析注射时间，无时区的输入按本地时间处理
fn parse_injection_time(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(time.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|t| t.with_timezone(&Utc))
                .with_context(|| format!("本地时间不存在: {}", raw));
        }
    }

    bail!("无法解析注射时间: {}", raw)
}
