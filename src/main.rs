use smelterdeck::adapters::ReqwestFetcher;
use smelterdeck::config::{DeckConfig, QueueAlert, QueueThresholds};
use smelterdeck::error::DeckError;
use smelterdeck::models::{NodeState, NodeStatus, QueueStatusReport, ResultPage, SystemStatus};
use smelterdeck::poll::{PollPolicy, PollerFactory};
use smelterdeck::services::{LoadService, NodesService, ServiceTick, StatusService};
use smelterdeck::state::StateStore;
use smelterdeck::storage::{LocalStore, UserStore};

use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: smelterdeck [OPTIONS]

Options:
      --api <URL>      Cluster API root, e.g. http://smelter:8000/api
      --config <PATH>  JSON config file merged over the defaults
      --once           Fetch one round of cluster status and exit
      --version        Print version and exit
  -h, --help           Print this help and exit
";

/// Parsed command line.
struct Args {
    api: Option<String>,
    config: Option<PathBuf>,
    once: bool,
}

fn parse_args() -> Result<Args, DeckError> {
    let mut args = Args {
        api: None,
        config: None,
        once: false,
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--api" => {
                let url = argv
                    .next()
                    .ok_or_else(|| DeckError::Usage("--api requires a URL".to_string()))?;
                args.api = Some(url);
            }
            "--config" => {
                let path = argv
                    .next()
                    .ok_or_else(|| DeckError::Usage("--config requires a path".to_string()))?;
                args.config = Some(PathBuf::from(path));
            }
            "--once" => args.once = true,
            other => {
                return Err(DeckError::Usage(format!("unknown argument: {}", other)));
            }
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    // Handle --version and --help before any initialization
    if std::env::args().any(|arg| arg == "--version") {
        println!("smelterdeck {}", VERSION);
        std::process::exit(0);
    }
    if std::env::args().any(|arg| arg == "--help" || arg == "-h") {
        print!("{}", USAGE);
        std::process::exit(0);
    }

    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smelterdeck=info")),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            eprint!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args))?;
    Ok(())
}

async fn run(args: Args) -> Result<(), DeckError> {
    // =========================================================
    // Configuration - defaults, optional file, env override
    // =========================================================

    let mut config = DeckConfig::load(args.config.as_deref());
    if let Some(api) = args.api {
        config = config.with_api_root(api);
    }
    let config = Arc::new(config);

    tracing::info!(
        api_root = %config.api_root,
        api_version = %config.api_version,
        "watching cluster"
    );

    // =========================================================
    // Shared state - durable user cell when a store is available
    // =========================================================

    let state = match config.storage_dir.clone() {
        Some(dir) => StateStore::with_user_store(UserStore::new(LocalStore::new(dir))),
        None => match UserStore::open() {
            Some(store) => StateStore::with_user_store(store),
            None => StateStore::new(),
        },
    };
    if let Some(creds) = state.user_creds() {
        tracing::info!(username = %creds.username, is_admin = creds.is_admin, "restored user session");
    }

    // =========================================================
    // Services - one poller factory shared across all of them
    // =========================================================

    let factory = PollerFactory::new(Arc::new(ReqwestFetcher::new()));
    let status = StatusService::new(factory.clone(), config.clone())
        .with_policy(PollPolicy::ContinueOnError);
    let nodes = NodesService::new(factory.clone(), config.clone())
        .with_policy(PollPolicy::ContinueOnError);
    let load =
        LoadService::new(factory, config.clone()).with_policy(PollPolicy::ContinueOnError);

    // Version probe doubles as a reachability check.
    match status.version_once().await {
        Ok(info) => {
            tracing::info!(version = %info.version, "cluster API reachable");
            state.version().set(info.version);
        }
        Err(err) => {
            tracing::warn!(error = %err, "version probe failed, continuing anyway");
        }
    }

    if args.once {
        let system = status.status_once().await?;
        log_status(&system);
        let node_page = nodes.node_status_once().await?;
        log_nodes(&node_page);
        let queue = load.queue_status_once().await?;
        log_queue(&queue, &config.queue_thresholds);
        return Ok(());
    }

    // =========================================================
    // Watch loop - three continue-on-error pollers until Ctrl-C
    // =========================================================

    let mut status_sub = status.status();
    let mut nodes_sub = nodes.node_status();
    let mut queue_sub = load.queue_status();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("interrupted, stopping watchers");
                status_sub.stop();
                nodes_sub.stop();
                queue_sub.stop();
                break;
            }
            tick = status_sub.next_tick() => match tick {
                Some(ServiceTick::Data(system)) => log_status(&system),
                Some(ServiceTick::Degraded(err)) => {
                    tracing::warn!(error = %err, "status poll failed");
                }
                None => break,
            },
            tick = nodes_sub.next_tick() => match tick {
                Some(ServiceTick::Data(page)) => log_nodes(&page),
                Some(ServiceTick::Degraded(err)) => {
                    tracing::warn!(error = %err, "node status poll failed");
                }
                None => break,
            },
            tick = queue_sub.next_tick() => match tick {
                Some(ServiceTick::Data(report)) => {
                    log_queue(&report, &config.queue_thresholds);
                }
                Some(ServiceTick::Degraded(err)) => {
                    tracing::warn!(error = %err, "queue status poll failed");
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// One log line per status tick, plus a warning when either the master
/// or the scheduler is unreachable.
fn log_status(status: &SystemStatus) {
    let resources = &status.resources;
    tracing::info!(
        master_online = status.master.is_online,
        scheduler_online = status.scheduler.is_online,
        scheduler_paused = status.scheduler.is_paused,
        queue_depth = status.queue_depth,
        cpus_scheduled_pct = resources.cpus_scheduled_pct(),
        mem_scheduled_pct = resources.mem_scheduled_pct(),
        "cluster status"
    );
    if !status.is_healthy() {
        tracing::warn!(
            master = %status.master.hostname,
            scheduler = %status.scheduler.hostname,
            "cluster is unhealthy"
        );
    }
}

/// Roll the node status page up into state counts, then flag every node
/// that is not plainly online.
fn log_nodes(page: &ResultPage<NodeStatus>) {
    let mut online = 0usize;
    let mut paused = 0usize;
    let mut high_failure = 0usize;
    let mut offline = 0usize;
    for row in &page.results {
        match row.state() {
            NodeState::Online => online += 1,
            NodeState::Paused => paused += 1,
            NodeState::HighFailure => high_failure += 1,
            NodeState::Offline => offline += 1,
        }
    }
    tracing::info!(
        total = page.results.len(),
        online,
        paused,
        high_failure,
        offline,
        "node states"
    );
    for row in &page.results {
        if row.state() != NodeState::Online {
            tracing::warn!(
                hostname = %row.node.hostname,
                state = row.state().label(),
                reason = %row.node.pause_reason,
                "node needs attention"
            );
        }
    }
}

/// Queue rollup with per-job-type alert levels. Warning and danger rows
/// get their own warn lines; the rest stay at debug.
fn log_queue(report: &QueueStatusReport, thresholds: &QueueThresholds) {
    tracing::info!(
        job_types = report.queue_status.len(),
        total_queued = report.total_count(),
        "queue status"
    );
    for row in report.deepest_first() {
        let alert = row.depth_alert(thresholds);
        match alert {
            QueueAlert::Warning | QueueAlert::Danger => {
                tracing::warn!(
                    job_type = %row.key(),
                    count = row.count,
                    alert = alert.as_str(),
                    "queue backlog"
                );
            }
            QueueAlert::Success | QueueAlert::Info => {
                tracing::debug!(
                    job_type = %row.key(),
                    count = row.count,
                    alert = alert.as_str(),
                    "queue backlog"
                );
            }
        }
    }
}
