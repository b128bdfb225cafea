use std::process;

use clap::Parser;
use cli::Cli;
use log::error;

fn main() {
    let cli = Cli::parse();
    let verbosity = cli.verbose + u8::from(!cli.quiet);
    logger::Logger::init(verbosity);

    if let Err(e) = sprime_rs::run(&cli) {
        error!("{e:?}");
        process::exit(1);
    }
}
