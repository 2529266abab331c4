use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GPTA_GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GPTA_GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("GPTA_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "gpta", bin_name = "gpta", version = get_version())]
#[command(
    about = "Interactive prompt packer: turns a project's files, tree and URLs into LLM prompts",
    long_about = None
)]
pub struct Cli {
    /// Record every resolution attempt in this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Restore a saved context before the session starts
    #[arg(long, value_name = "PATH")]
    pub load: Option<PathBuf>,

    /// Read configuration from this file instead of the usual locations
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start without the built-in ignore patterns
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Installs the stderr diagnostics subscriber. `RUST_LOG` wins over the
/// level implied by `--verbose`.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();
    let _ = subscriber.try_init();
}
