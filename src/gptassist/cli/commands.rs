use super::render::write_result;
use super::session::Session;
use super::setup::{init_tracing, Cli};
use clap::Parser;
use gptassist::api::AssistApi;
use gptassist::catalog::{CommandResolver, ResolutionLog, CATALOG};
use gptassist::clipboard::SystemClipboard;
use gptassist::collect::ContentCollector;
use gptassist::config::AssistConfig;
use gptassist::error::Result;
use gptassist::model::{Context, ProjectState};
use gptassist::shell::HostShell;
use gptassist::store::fs::FileBackend;
use std::io;
use std::path::Path;
use tracing::{info, warn};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = load_config(&cli, &cwd);
    let mut session = init_session(&cli, &config, &cwd);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = &cli.load {
        let result = session.api.load(path)?;
        write_result(&mut out, &result)?;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    session.run_loop(&mut input, &mut out)
}

/// `--config` if given, otherwise the first config found from `cwd`. A
/// broken config file is not fatal; the session starts with defaults.
fn load_config(cli: &Cli, cwd: &Path) -> AssistConfig {
    let loaded = match &cli.config {
        Some(path) => AssistConfig::load_file(path),
        None => AssistConfig::discover(cwd),
    };
    loaded.unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {}", e);
        AssistConfig::default()
    })
}

fn initial_state(cli: &Cli, config: &AssistConfig) -> ProjectState {
    let ignores: &[String] = if cli.no_default_ignores {
        &[]
    } else {
        &config.default_ignores
    };
    ProjectState::new(Context::seeded(ignores, &config.default_extensions))
}

fn init_session(cli: &Cli, config: &AssistConfig, cwd: &Path) -> Session<FileBackend> {
    let api = AssistApi::new(
        initial_state(cli, config),
        FileBackend::new(),
        ContentCollector::new(cwd),
        Box::new(SystemClipboard),
    );

    let mut resolver = CommandResolver::new(&CATALOG);
    if let Some(path) = cli.log.as_ref().or(config.log_file.as_ref()) {
        match ResolutionLog::create(path) {
            Ok(log) => {
                info!("logging resolutions to {}", path.display());
                resolver = resolver.with_log(log);
            }
            Err(e) => warn!("could not create log {}: {}", path.display(), e),
        }
    }

    Session::new(
        api,
        resolver,
        Box::new(HostShell),
        config.header.clone(),
        config.state_file.clone(),
    )
}
