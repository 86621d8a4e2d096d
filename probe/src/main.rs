#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use probe_config::Config;
use probe_contract::{Case, Checker};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list {
        for case in Case::all() {
            println!("{:<26} {}", case.id(), case.description());
        }
        return Ok(());
    }

    let config = resolve_config(&args)?;

    let telemetry_guard = probe_telemetry::init(config.telemetry.as_ref(), &args.log_filter, args.log_format.into())?;

    tracing::info!(
        config_path = %args.config.display(),
        base_url = %config.target.base_url,
        endpoint = %config.target.endpoint,
        "starting probe"
    );

    let checker = Checker::new(config)?;

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    let report = tokio::select! {
        report = checker.run_selected() => report,
        () = shutdown.cancelled() => anyhow::bail!("run cancelled before all cases finished"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Err(e) = telemetry_guard.force_flush() {
        tracing::warn!(error = %e, "failed to flush metrics");
    }

    if !report.is_success() {
        anyhow::bail!("{} of {} cases failed", report.failed(), report.cases.len());
    }

    Ok(())
}

/// Load the config file, or build one from `--base-url` when no file exists,
/// then apply command-line overrides
fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else if let Some(ref base_url) = args.base_url {
        Config::for_base_url(base_url.as_str())?
    } else {
        anyhow::bail!(
            "config file {} not found and no --base-url given",
            args.config.display()
        );
    };

    if let Some(ref base_url) = args.base_url {
        config.target.base_url = base_url.clone();
    }

    if let Some(ref endpoint) = args.endpoint {
        config.target.endpoint.clone_from(endpoint);
    }

    if !args.cases.is_empty() {
        config.suite.cases.clone_from(&args.cases);
        config.suite.skip.retain(|id| !args.cases.contains(id));
    }

    config.validate()?;

    Ok(config)
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
