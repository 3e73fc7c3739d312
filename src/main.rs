mod args;
mod margins;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::margins::{run_chart, RenderOutcome};

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    match run_chart(&args) {
        Ok(RenderOutcome::Rendered(_)) => {}
        Ok(RenderOutcome::NoData) => {
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("An error occured: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&*e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
