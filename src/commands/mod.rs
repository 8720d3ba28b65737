mod resolve;
mod run;

pub use resolve::run_resolve;
pub use run::{run_suites, RunArgs};
