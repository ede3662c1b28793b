use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use clap::{Command, arg, command, value_parser};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::FifoMessageTracker;

use crate::config::get_cli_config;
use crate::replay::replay;

mod config;
mod replay;
mod script;

fn main() -> anyhow::Result<()> {
    // ignore failures as .env might not be present at runtime, and this use-case is tolerated
    dotenv()
        .inspect_err(|err| eprintln!("[WARN] reading .env files is failed with err {err}"))
        .ok();

    let config = get_cli_config()?;

    // logs go to stderr so replay output stays clean on stdout
    let (non_blocking_appender, _guard_stderr) = tracing_appender::non_blocking(io::stderr());
    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_filter(config.rust_log);
    tracing_subscriber::registry()
        .with(stderr_subscriber)
        .init();

    let matches = command!() // requires `cargo` feature
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            arg!(--capacity <N> "Maximum number of tracked messages, overrides TRACKER_CAPACITY")
                .value_parser(value_parser!(usize)),
        )
        .subcommand(
            Command::new("replay")
                .alias("r")
                .about("replay tracker commands from a file, or stdin if omitted")
                .arg(arg!([FILE])),
        )
        .get_matches();

    let capacity = matches
        .get_one::<usize>("capacity")
        .copied()
        .unwrap_or(config.tracker_capacity);
    let mut tracker = FifoMessageTracker::new(capacity)?;
    info!("Created message tracker with capacity {capacity}");

    match matches.subcommand() {
        Some(("replay", sub_matches)) => {
            let input: Box<dyn BufRead> = match sub_matches.get_one::<String>("FILE") {
                Some(path) => Box::new(BufReader::new(
                    File::open(path).with_context(|| format!("failed to open {path}"))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            replay(&mut tracker, input, &mut io::stdout().lock())?;
        }
        _ => (),
    };

    Ok(())
}
