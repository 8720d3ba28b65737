mod cli;
mod commands;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::{run_resolve, run_suites};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Run {
            suites_dir,
            suite,
            tag,
            parallel,
            reports_dir,
            base_url,
            viewport,
            headless,
            fixtures,
        } => {
            run_suites(commands::RunArgs {
                config: args.config,
                suites_dir,
                suite,
                tag,
                parallel,
                reports_dir,
                base_url,
                viewport,
                headless,
                fixtures,
            })
            .await
        }
        Commands::Resolve { url } => run_resolve(url, args.verbose),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
