//! tariff-compare entry point: CLI wiring, tariff loading, and report output.

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tariff_compare::billing::engine::Engine;
use tariff_compare::billing::types::Reading;
use tariff_compare::config::TariffConfig;
use tariff_compare::demo::DemoLoad;
use tariff_compare::io::export::export_csv;
use tariff_compare::io::load_readings;

use cli::Args;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tariff_compare=debug"
    } else {
        "tariff_compare=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads tariffs: `--tariff` file if given, otherwise the named preset.
fn load_config(args: &Args) -> anyhow::Result<TariffConfig> {
    let mut config = match &args.tariff {
        Some(path) => TariffConfig::from_toml_file(path)?,
        None => TariffConfig::from_preset(&args.preset)?,
    };
    if let Some(tz) = &args.timezone {
        config.calendar.timezone.clone_from(tz);
    }
    if let Some(method) = args.tiered_method {
        config.tiered.method = method;
    }
    Ok(config)
}

fn load_usage(args: &Args, engine: &Engine) -> anyhow::Result<Vec<Reading>> {
    let tz = engine.timezone();
    if args.demo {
        let start = args
            .start
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| midnight.and_local_timezone(tz).earliest())
            .with_context(|| format!("{} has no midnight in {tz}", args.start))?;
        info!(days = args.days, seed = args.seed, %start, "generating demo usage");
        return Ok(DemoLoad::default().generate(start, args.days, args.seed));
    }

    let Some(path) = &args.input else {
        bail!("either --input or --demo is required");
    };
    load_readings(path, args.format, tz)
        .with_context(|| format!("failed to load usage from \"{}\"", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let engine = Engine::from_config(&config)?;

    let readings = load_usage(&args, &engine)?;
    if readings.is_empty() {
        warn!("no readings loaded, nothing to compare");
    }

    let report = engine.run(&readings)?;

    println!("{report}");
    if args.breakdown {
        println!("\n{}", report.breakdown());
    }

    if let Some(path) = &args.report_out {
        export_csv(&report, path)
            .with_context(|| format!("failed to write report to \"{}\"", path.display()))?;
        info!(path = %path.display(), "monthly summaries written");
    }

    #[cfg(feature = "tui")]
    if args.tui {
        tariff_compare::tui::run(&report).context("terminal UI failed")?;
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(tariff_compare::api::AppState {
            report,
            timezone: engine.timezone(),
            tiered_method: engine.method(),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(tariff_compare::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
