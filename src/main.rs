use clap::Parser;
use geoseq::core::report;
use geoseq::core::ConfigProvider;
use geoseq::utils::{logger, validation::Validate};
use geoseq::{
    BenchEngine, CliConfig, GeoError, LocalStorage, RunConfig, SingleRunReport, TimingSeries,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    };

    logger::init_logger(cli.verbose, config.json_logs);

    tracing::info!("Starting geoseq");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if cli.dry_run {
        println!("🔍 Dry run: nothing was evaluated.");
        return Ok(());
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: RunConfig) -> geoseq::Result<()> {
    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current size");
                cancelled.store(true, Ordering::SeqCst);
            }
        });
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let engine = BenchEngine::new_with_monitoring(storage, config, monitor_enabled);
    let params = engine.params()?;

    let report = engine.run_single(&params).await?;
    print_single_run(&report);

    let mut series = Vec::new();
    if engine.config().series_enabled() {
        let bar = series_progress_bar(params.n);
        let callback_bar = bar.clone();
        let flag = Arc::clone(&cancelled);

        let outcome = engine
            .run_series(&params, move |progress| {
                if progress.completed == 1 {
                    callback_bar.reset();
                    callback_bar.set_message(format!("{} series", progress.operation));
                }
                callback_bar.set_position(progress.completed);
                !flag.load(Ordering::SeqCst)
            })
            .await;
        bar.finish_and_clear();

        match outcome {
            Ok(measured) => {
                print_series_summary(&measured);
                series = measured;
            }
            Err(e @ GeoError::Cancelled { .. }) => {
                tracing::warn!("{}", e);
                println!("⏹️ {}", e.user_friendly_message());
            }
            Err(e) => return Err(e),
        }
    }

    let written = engine.export(&params, &report, &series).await?;
    for path in &written {
        println!("📁 Saved {}", path);
    }

    Ok(())
}

fn series_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

fn display_config_summary(config: &RunConfig) {
    println!("📋 Configuration Summary:");
    println!("  a = {}, r = {}, n = {}", config.a, config.r, config.n);
    println!("  Operation: {:?}", config.operation);
    println!("  Series: {}", config.series);
    println!("  Max n: {}", config.max_n);
    println!("  Recursion limit: {}", config.recursion_limit);
    if !config.export_formats.is_empty() {
        println!(
            "  Export: {} -> {}",
            config.export_formats.join(", "),
            config.output_path
        );
    }
    println!();
}

fn print_single_run(report: &SingleRunReport) {
    for line in report::format_single_run(report) {
        println!("{}", line);
    }
    println!();
    for operation in report.operations() {
        if let Some(chart) = report::bar_chart(report, operation) {
            println!("{}", report::render_bar_chart(&chart, 40));
        }
    }
}

fn print_series_summary(series: &[TimingSeries]) {
    for s in series {
        let iterative: f64 = s.iterative_times.iter().sum();
        let recursive: f64 = s.recursive_times.iter().sum();
        println!(
            "📈 {} series over n = 1..={}: iterative total {}, recursive total {}",
            s.operation,
            s.len(),
            report::format_elapsed(iterative),
            report::format_elapsed(recursive)
        );
    }
}
