use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

use gridrun_lib::fixtures::{self, TestData};
use gridrun_lib::{
    BrowserManager, EndpointResolver, GridConfig, HarnessConfig, HarnessError, Result, Suite,
    SuiteRunner, TestHarness, Viewport,
};

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub suites_dir: Option<PathBuf>,
    pub suite: Option<String>,
    pub tag: Option<String>,
    pub parallel: bool,
    pub reports_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub viewport: Option<Viewport>,
    pub headless: bool,
    pub fixtures: Option<PathBuf>,
}

/// Runs suites and maps the outcome to an exit code: 0 all passed, 1 some
/// failed, 2 the harness itself broke.
pub async fn run_suites(args: RunArgs) -> ExitCode {
    match execute(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("harness error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn execute(args: RunArgs) -> Result<bool> {
    let config = load_config(&args)?;

    // The grid target is resolved once, at configuration-load time.
    let resolver = EndpointResolver::new();
    let grid = GridConfig::from_env(&resolver);

    let suites = load_suites(&args)?;
    if suites.is_empty() {
        return Err(HarnessError::config("no suites selected"));
    }

    let harness = TestHarness::new(config.reports_dir.clone());
    harness.setup(&grid)?;

    let manager = BrowserManager::new(config, grid);
    let runner = SuiteRunner::new(&manager);
    let report = if args.parallel {
        runner.run_parallel(&suites).await
    } else {
        runner.run_sequential(&suites).await
    };

    harness.teardown(&report)?;
    Ok(report.all_passed())
}

fn load_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(viewport) = args.viewport {
        config.viewport = viewport;
    }
    if let Some(reports_dir) = &args.reports_dir {
        config.reports_dir = reports_dir.clone();
    }
    if args.headless {
        config.headless = true;
    }
    Ok(config)
}

fn load_suites(args: &RunArgs) -> Result<Vec<Suite>> {
    let mut suites = match &args.suites_dir {
        Some(dir) => Suite::load_all(dir)?,
        None => {
            let data = match &args.fixtures {
                Some(path) => TestData::load(path)?,
                None => TestData::default(),
            };
            fixtures::builtin_suites(&data)
        }
    };

    if let Some(tag) = &args.tag {
        suites.retain(|s| s.has_tag(tag));
    }
    if let Some(name) = &args.suite {
        suites.retain(|s| &s.name == name);
        if suites.is_empty() {
            return Err(HarnessError::SuiteNotFound(name.clone()));
        }
    }
    Ok(suites)
}
