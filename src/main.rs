use anyhow::Context;
use clap::Parser;
use exam_timer::utils::{logger, validation::Validate};
use exam_timer::{
    format_duration, minutes_to_seconds, CliConfig, Command, ConsoleSink, Countdown,
    CountdownOutcome, Session, StopHandle, SystemClock, TimerError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting exam-timer");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證設定
    if let Err(e) = config.validate() {
        fail(&e);
    }

    // 載入場次設定
    let session = match config.load_session() {
        Ok(session) => session,
        Err(e) => fail(&e),
    };

    // 執行子命令
    match &config.command {
        Command::Plan { json } => {
            if let Err(e) = print_plan(&session, *json) {
                fail(&e);
            }
        }
        Command::Run(run) => {
            let minutes = match run.resolve_minutes(&session) {
                Ok(minutes) => minutes,
                Err(e) => fail(&e),
            };
            run_countdown(minutes).await?;
        }
    }

    Ok(())
}

fn fail(e: &TimerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_plan(session: &Session, json: bool) -> exam_timer::Result<()> {
    let plan = &session.plan;

    // JSON 輸出
    if json {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    // 表格輸出
    let exam = plan.exam();
    println!(
        "Exam: base {:.2} mins, reading {:.2} mins, standard total {:.2} mins",
        exam.base_minutes(),
        exam.reading_minutes(),
        exam.total_standard_time()
    );

    if plan.groups().is_empty() {
        println!("No student groups. Add some with --standard or --group.");
        return Ok(());
    }

    println!();
    println!(
        "{:<15} | {:<12} | {:<18} | {:<20}",
        "Students Count", "Additional %", "Total Time (mins)", "Total Time (HH:MM:SS)"
    );
    println!("{}", "-".repeat(75));
    for timing in plan.timings() {
        println!(
            "{:<15} | {:<12} | {:<18.2} | {:<20}",
            timing.count, timing.label, timing.total_minutes, timing.formatted
        );
    }

    // 可選時長
    println!();
    println!("Durations (run --option N):");
    for (i, option) in plan.duration_options().iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    Ok(())
}

async fn run_countdown(minutes: f64) -> anyhow::Result<()> {
    let countdown = match Countdown::new(minutes) {
        Ok(countdown) => countdown,
        Err(e) => fail(&e),
    };

    // 顯示開始與預計結束時間
    let total_seconds = minutes_to_seconds(minutes);
    println!(
        "Starting timer for {:.2} minutes ({})",
        minutes,
        format_duration(total_seconds)
    );
    if let Some(ends_at) = i64::try_from(total_seconds)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .and_then(|delta| chrono::Local::now().checked_add_signed(delta))
    {
        println!("Expected end: {}", ends_at.format("%H:%M:%S"));
    }

    // Ctrl-C 停止計時
    let stop = StopHandle::new();
    let ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.stop();
        }
    });

    // 在阻塞執行緒上倒數
    let report = tokio::task::spawn_blocking(move || {
        let mut sink = ConsoleSink::new();
        countdown.run(&SystemClock, &mut sink, &stop)
    })
    .await
    .context("countdown thread panicked")?;

    // 回報結果
    match report.outcome {
        CountdownOutcome::Completed => {
            tracing::info!("✅ Countdown completed ({} announcements)", report.announcements)
        }
        CountdownOutcome::Cancelled => {
            tracing::warn!("🛑 Countdown cancelled");
            println!("Timer stopped.");
        }
    }

    Ok(())
}
