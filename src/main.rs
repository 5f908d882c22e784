mod args;
mod dash;

use clap::Parser;
use log::debug;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = dash::run_dashboard(&args) {
        eprintln!("An error occured: {}", e);
        let mut source = std::error::Error::source(&*e);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = std::error::Error::source(cause);
        }
        std::process::exit(1);
    }
}
