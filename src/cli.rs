use clap::{Parser, Subcommand};
use gridrun_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridrun")]
#[command(
    version,
    about = "Browser end-to-end test harness with local and containerized grid execution",
    long_about = "gridrun\n\nModes:\n- run: execute declarative test suites against a local browser or a remote grid.\n- resolve: show which grid hostname a connection override resolves to.\n\nThe grid override is read from SELENIUM_HUB_URL; invalid overrides fall back to a safe default.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for base URL/instances/timeouts; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run test suites
    Run {
        #[arg(
            long,
            value_name = "PATH",
            help = "Directory of suite TOML files; built-in suites run if omitted"
        )]
        suites_dir: Option<PathBuf>,

        #[arg(long, help = "Run only the suite with this name")]
        suite: Option<String>,

        #[arg(long, help = "Run only suites carrying this tag")]
        tag: Option<String>,

        #[arg(long, help = "Run suites in parallel, bounded by max-instances")]
        parallel: bool,

        #[arg(long, value_name = "PATH", help = "Directory for screenshots and the run report")]
        reports_dir: Option<PathBuf>,

        #[arg(long, help = "Base URL for relative navigation targets")]
        base_url: Option<String>,

        #[arg(long, help = "Viewport dimensions (WIDTHxHEIGHT)")]
        viewport: Option<Viewport>,

        #[arg(long, help = "Run the local browser headless")]
        headless: bool,

        #[arg(
            long,
            value_name = "PATH",
            help = "Fixture data TOML overriding the built-in test data"
        )]
        fixtures: Option<PathBuf>,
    },

    /// Resolve and print the grid hostname
    Resolve {
        #[arg(
            value_name = "URL",
            help = "Connection override to resolve; reads SELENIUM_HUB_URL if omitted"
        )]
        url: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
