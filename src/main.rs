use clap::Parser;
use sortdir::cli::{self, Args};
use sortdir::output::OutputFormatter;
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(e) = cli::run(&args) {
        OutputFormatter::error(&e);
        process::exit(1);
    }
}
