mod args;
mod dash;

use clap::Parser;
use log::{info, LevelFilter};
use std::error::Error;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
    info!("args: {:?}", args);

    if let Err(e) = dash::run_dashboard(&args) {
        eprintln!("An error occured: {}", e);
        let mut source = e.source();
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        std::process::exit(1);
    }
}
