use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use loggrab_advanced_logging::{AdvancedLogging, TestScope};
use loggrab_collection::{ExtractionReport, LogGrabber, PreparedState, ServerLogsConfig, TransportFactory};
use loggrab_common::{CollectPolicy, TestStatus};

/// loggrab - capture the remote log lines written while a test runs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration
    CheckConfig,

    /// Record the current length of every configured log
    Prepare {
        /// Where to save the recorded offsets
        #[arg(long, value_name = "FILE")]
        state: PathBuf,
    },

    /// Download the lines appended since `prepare`
    Collect {
        /// Offsets saved by `prepare`
        #[arg(long, value_name = "FILE")]
        state: PathBuf,

        #[command(flatten)]
        target: TestTarget,

        /// Final status of the test
        #[arg(long, default_value = "FAIL")]
        status: TestStatus,
    },

    /// Track, run a test command, then collect according to its exit code
    Run {
        #[command(flatten)]
        target: TestTarget,

        /// Test command and its arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

/// Where collected logs go and when they are collected
#[derive(ClapArgs, Debug)]
struct TestTarget {
    /// Root of the advanced log hierarchy
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Suite chain, outermost first, separated by `/`
    #[arg(long)]
    suite: String,

    /// Test name; without it logs go to the suite folder
    #[arg(long)]
    test: Option<String>,

    /// When to collect: always or on-failure
    #[arg(long, default_value = "on-failure")]
    policy: CollectPolicy,

    /// Name of the folder the hierarchy is built under
    #[arg(long)]
    folder_name: Option<String>,
}

impl TestTarget {
    fn scope(&self) -> TestScope {
        TestScope {
            suite_path: TestScope::parse_suite_path(&self.suite),
            test_name: self.test.clone(),
        }
    }

    fn resolver(&self) -> AdvancedLogging {
        let resolver = AdvancedLogging::new(&self.output_dir);
        match &self.folder_name {
            Some(name) => resolver.with_folder_name(name),
            None => resolver,
        }
    }

    fn grabber(&self, config: ServerLogsConfig) -> LogGrabber {
        LogGrabber::new(config, Arc::new(TransportFactory), Arc::new(self.resolver()))
            .with_policy(self.policy)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.debug)?;

    info!("Config file: {}", args.config.display());
    let config = ServerLogsConfig::load_from_file(&args.config)?;

    match args.command {
        Command::CheckConfig => check_config(&config),
        Command::Prepare { state } => prepare(config, &state).await,
        Command::Collect {
            state,
            target,
            status,
        } => collect(config, &state, &target, status).await,
        Command::Run { target, command } => {
            let code = run(config, &target, &command).await?;
            std::process::exit(code);
        }
    }
}

fn check_config(config: &ServerLogsConfig) -> Result<()> {
    println!(
        "Configuration OK: {} server(s), {} log pattern(s), tmpdir {}",
        config.servers.len(),
        config.pattern_count(),
        config.tmpdir
    );
    for server in &config.servers {
        let subsystems: Vec<_> = server.subsystems.iter().map(|s| s.name.as_str()).collect();
        println!("  {} [{}]", server.alias(), subsystems.join(", "));
    }
    Ok(())
}

async fn prepare(config: ServerLogsConfig, state_path: &Path) -> Result<()> {
    // Prepare never collects, so the resolver is never asked for a directory
    let mut grabber = LogGrabber::new(
        config,
        Arc::new(TransportFactory),
        Arc::new(AdvancedLogging::new(".")),
    );

    let result = async {
        grabber.start_suite().await?;
        grabber.start_test().await?;
        grabber.prepared_state().save(state_path).await?;
        anyhow::Ok(())
    }
    .await;
    close(&mut grabber).await;
    result?;

    let state = grabber.prepared_state();
    println!(
        "Tracked {} log file(s) on {} server(s), state saved to {}",
        state.log_count(),
        state.servers.len(),
        state_path.display()
    );
    Ok(())
}

async fn collect(
    config: ServerLogsConfig,
    state_path: &Path,
    target: &TestTarget,
    status: TestStatus,
) -> Result<()> {
    let state = PreparedState::load(state_path)
        .await
        .with_context(|| format!("Failed to load state from {}", state_path.display()))?;

    let mut grabber = target.grabber(config);
    let result = async {
        grabber.start_suite().await?;
        grabber.restore_state(state);
        Ok::<_, anyhow::Error>(grabber.end_test(&target.scope(), status).await?)
    }
    .await;
    close(&mut grabber).await;

    print_report(result?.as_ref());
    Ok(())
}

async fn run(config: ServerLogsConfig, target: &TestTarget, command: &[String]) -> Result<i32> {
    let mut grabber = target.grabber(config);

    let result = async {
        grabber.start_suite().await?;
        grabber.start_test().await?;

        let code = run_test_command(command).await?;
        let status = if code == 0 { TestStatus::Pass } else { TestStatus::Fail };
        info!(code, status = %status, "Test command finished");

        let report = grabber.end_test(&target.scope(), status).await?;
        Ok::<_, anyhow::Error>((code, report))
    }
    .await;
    close(&mut grabber).await;

    let (code, report) = result?;
    print_report(report.as_ref());
    Ok(code)
}

async fn run_test_command(command: &[String]) -> Result<i32> {
    let (program, args) = command.split_first().context("No test command given")?;

    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to run test command: {}", program))?;

    // A signal-terminated command counts as a failure
    Ok(status.code().unwrap_or(1))
}

async fn close(grabber: &mut LogGrabber) {
    if let Err(e) = grabber.end_suite().await {
        warn!("Failed to close sessions: {}", e);
    }
}

fn print_report(report: Option<&ExtractionReport>) {
    match report {
        Some(ExtractionReport {
            archive: Some(path), ..
        }) => println!("{}", path.display()),
        Some(_) => println!("No new log lines"),
        None => println!("Log collection skipped"),
    }
}

fn initialize_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
