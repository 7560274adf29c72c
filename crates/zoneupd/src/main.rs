// # zoneupd - DNS reconciliation daemon
//
// Thin integration layer over `zoneup-core`:
//
// 1. resolve options and the config file path
// 2. load (or bootstrap) the configuration
// 3. wire the GoDaddy provider and the HTTP IP resolver into the
//    reconciliation engine
// 4. run one pass immediately, then keep re-running on a timer
// 5. on SIGINT/SIGTERM, optionally revert all records before exit
//
// ## Configuration
//
// - config file: `./config.json`, overridable via `ZONEUP_CONFIG`
// - log level: `ZONEUP_LOG` (trace|debug|info|warn|error); the
//   `--verbose` flag raises the default from info to debug
// - flags: `-s/--setup` adopts every A record the credentials can
//   see, `-v/--verbose`
//
// If no config file exists, a sample is written and the process exits
// cleanly so the operator can fill in credentials and restart.

mod setup;

use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use zoneup_core::{Config, ConfigStore, Error, PassOutcome, Reconciler};
use zoneup_ip_http::HttpIpResolver;
use zoneup_provider_godaddy::GoDaddyProvider;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Config file used when `ZONEUP_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Upper bound on the shutdown reset sweep. A kill mid-reset leaves
/// stale records pointing at a dead host, so the sweep gets a real
/// chance to finish, but never holds the process hostage.
const RESET_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes for the distinct termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneupExitCode {
    /// Clean shutdown, or sample config bootstrapped
    CleanShutdown = 0,
    /// Config unreadable and uncreatable, or invalid
    ConfigError = 1,
    /// No domains configured in one-shot mode
    NoDomains = 2,
    /// Config write failure during setup
    ConfigWriteError = 3,
    /// Unexpected runtime failure
    RuntimeError = 4,
}

impl From<ZoneupExitCode> for ExitCode {
    fn from(code: ZoneupExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Resolved command-line options. The surface is intentionally tiny;
/// everything else lives in the config file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Options {
    setup: bool,
    verbose: bool,
}

impl Options {
    fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self::default();
        for arg in args {
            match arg.as_str() {
                "-s" | "--setup" => options.setup = true,
                "-v" | "--verbose" => options.verbose = true,
                other => eprintln!("ignoring unknown argument: {other}"),
            }
        }
        options
    }
}

fn main() -> ExitCode {
    let options = Options::from_args(std::env::args().skip(1));

    let log_level = match std::env::var("ZONEUP_LOG").ok().as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ if options.verbose => Level::DEBUG,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return ZoneupExitCode::RuntimeError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return ZoneupExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(options)).into()
}

async fn run(options: Options) -> ZoneupExitCode {
    let config_path =
        std::env::var("ZONEUP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let store = ConfigStore::new(&config_path);

    let config = match store.load().await {
        Ok(config) => config,
        Err(cause) => return bootstrap_sample_config(&store, &cause).await,
    };

    if let Err(e) = config.validate() {
        error!("invalid config at {}: {e}", store.path().display());
        return ZoneupExitCode::ConfigError;
    }

    let provider = match GoDaddyProvider::new(&config.credentials) {
        Ok(provider) => provider,
        Err(e) => {
            error!("cannot build provider client: {e}");
            return ZoneupExitCode::ConfigError;
        }
    };
    let resolver = HttpIpResolver::default();

    let config = if options.setup {
        info!("setup requested, discovering managed records");
        let adopted = match setup::adopt_all_records(&provider, config).await {
            Ok(adopted) => adopted,
            Err(e) => {
                error!("setup failed: {e}");
                return ZoneupExitCode::RuntimeError;
            }
        };

        if let Err(e) = store.save(&adopted).await {
            error!("could not save config after setup: {e}");
            return ZoneupExitCode::ConfigWriteError;
        }
        info!(
            domains = adopted.domains.len(),
            records = adopted.record_count(),
            "setup complete, config saved"
        );
        adopted
    } else {
        config
    };

    run_daemon(config, provider, resolver).await
}

/// No readable config: write the sample and tell the operator what to
/// do next. Only a failed write is an error exit.
async fn bootstrap_sample_config(store: &ConfigStore, cause: &Error) -> ZoneupExitCode {
    warn!("config file cannot be read: {cause}");

    match store.save(&Config::default()).await {
        Ok(()) => {
            info!(
                "sample config written to {}; add your API credentials and restart",
                store.path().display()
            );
            ZoneupExitCode::CleanShutdown
        }
        Err(e) => {
            error!("cannot create sample config: {e}");
            ZoneupExitCode::ConfigError
        }
    }
}

async fn run_daemon(
    config: Config,
    provider: GoDaddyProvider,
    resolver: HttpIpResolver,
) -> ZoneupExitCode {
    let one_shot = !config.auto_update.enabled;
    let reset_on_exit = config.reset_on_exit;
    let interval_minutes = config.auto_update.effective_interval();

    let mut reconciler = Reconciler::new(Box::new(resolver), Box::new(provider), &config);

    info!(
        domains = config.domains.len(),
        records = config.record_count(),
        "starting reconciliation"
    );

    // First pass runs immediately; the timer only covers repeats.
    match reconciler.run_pass().await {
        Ok(outcome) => log_outcome(&outcome),
        Err(e @ Error::ConfigIncomplete(_)) if one_shot => {
            error!("{e}");
            return ZoneupExitCode::NoDomains;
        }
        Err(e) if one_shot => {
            error!("reconciliation failed: {e}");
            return ZoneupExitCode::RuntimeError;
        }
        Err(e) => error!("reconciliation pass failed: {e}"),
    }

    if one_shot {
        info!("auto-update disabled, exiting after one pass");
        return ZoneupExitCode::CleanShutdown;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // An interval fires immediately; the first pass already ran.
    ticker.tick().await;
    info!("auto-update armed: every {interval_minutes} minute(s)");

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // The pass is awaited inline, so ticks can never
                // overlap a sweep still in flight; with Delay
                // behavior a pass longer than the interval simply
                // pushes the next tick out.
                match reconciler.run_pass().await {
                    Ok(outcome) => log_outcome(&outcome),
                    Err(e) => error!("reconciliation pass failed: {e}"),
                }
            }
            received = &mut shutdown => {
                match received {
                    Ok(name) => info!("received {name}, stopping"),
                    Err(e) => {
                        error!("signal handler failed: {e}");
                        return ZoneupExitCode::RuntimeError;
                    }
                }
                break;
            }
        }
    }

    if reset_on_exit {
        info!("resetOnExit enabled, reverting managed records");
        match tokio::time::timeout(RESET_TIMEOUT, reconciler.reset()).await {
            Ok(Ok(report)) if report.fully_succeeded() => {
                info!(records = report.attempted, "all records reverted");
            }
            Ok(Ok(report)) => {
                warn!(
                    records = report.attempted,
                    failed = report.failures.len(),
                    "reset completed with failures; some records may be stale"
                );
            }
            Ok(Err(e)) => error!("reset sweep failed: {e}"),
            Err(_) => error!(
                "reset timed out after {RESET_TIMEOUT:?}; records may still point at this host"
            ),
        }
    }

    info!("shutdown complete");
    ZoneupExitCode::CleanShutdown
}

fn log_outcome(outcome: &PassOutcome) {
    match outcome {
        PassOutcome::NoOp { current_ip } => {
            tracing::debug!(ip = %current_ip, "no change");
        }
        PassOutcome::Swept(report) => {
            tracing::debug!(
                ip = %report.target_ip,
                records = report.attempted,
                failed = report.failures.len(),
                "sweep finished"
            );
        }
    }
}

/// Resolve when a termination signal arrives (SIGTERM or SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> anyhow::Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to set up SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to set up SIGINT handler: {e}"))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Fallback for non-Unix platforms: ctrl-c only
#[cfg(not(unix))]
async fn wait_for_shutdown() -> anyhow::Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to wait for ctrl-c: {e}"))?;
    Ok("ctrl-c")
}
