use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use parbar::{parallel_with_options, RunOptionsBuilder, WorkError, WorkerContext};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("parbar")
        .about("Process a batch of integers in parallel, appending each to a per-worker file")
        .arg(
            Arg::new("items")
                .long("items")
                .value_parser(value_parser!(u64))
                .default_value("30")
                .help("Number of integers to process"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .value_parser(value_parser!(usize))
                .default_value("4")
                .help("Number of worker threads"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Directory for the per-worker output files"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .action(ArgAction::SetTrue)
                .help("Suppress the progress line"),
        )
        .get_matches();

    let items = *matches.get_one::<u64>("items").expect("defaulted");
    let workers = *matches.get_one::<usize>("workers").expect("defaulted");
    let output_dir = matches
        .get_one::<PathBuf>("output-dir")
        .expect("defaulted")
        .clone();
    let silent = matches.get_flag("silent");

    let options = RunOptionsBuilder::new().silent(silent).build();
    let stats = parallel_with_options(
        move |ctx: &WorkerContext, x: u64| -> Result<(), WorkError> {
            let path = output_dir.join(format!("{}.txt", ctx.index()));
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{x}")?;
            Ok(())
        },
        (0..items).collect(),
        workers,
        &options,
    )?;

    println!("{} items processed, {} failed", stats.completed, stats.failed);
    if stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
