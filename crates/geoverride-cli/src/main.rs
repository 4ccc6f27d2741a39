//! geoverride — Command-line interface for geoverride-core
//!
//! This binary edits the geo override document stored under `"geo.custom"`
//! in the admin settings store, and shows the base directory with the
//! override applied.
//!
//! Usage examples
//! --------------
//!
//! - Print the stored override
//!   $ geoverride show
//!
//! - Add a custom state, then a district below it
//!   $ geoverride add-state --code RJ --name-en Rajasthan --name-hi राजस्थान
//!   $ geoverride add-district RJ --code RJ-35 --name-en Kotputli
//!
//! - Rename a state code (districts, cities and hidden codes follow)
//!   $ geoverride rename states RJ RAJ
//!
//! - Hide a district of the base directory
//!   $ geoverride hide districts:RAJ RJ-33
//!
//! - Work on a local settings file instead of the REST endpoint
//!   $ geoverride --file settings.json show
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).
use clap::Parser;
use geoverride_cli::args::CliArgs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    geoverride_cli::run(args, &mut out)
}
