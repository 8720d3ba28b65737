use std::process::ExitCode;

use gridrun_lib::endpoint::grid_override_from_env;
use gridrun_lib::EndpointResolver;

/// Resolves a grid override (argument, else environment) and prints the
/// hostname. Resolution never fails, so this always exits cleanly.
pub fn run_resolve(url: Option<String>, verbose: bool) -> ExitCode {
    let raw = url.or_else(grid_override_from_env);

    let resolver = EndpointResolver::new();
    let target = resolver.resolve(raw.as_deref());

    if verbose {
        if let Some(reason) = target.rejection() {
            eprintln!("override rejected: {reason}");
        }
    }
    println!("{}", target.host());

    ExitCode::SUCCESS
}
