//! The main entry point for the localrepo CLI.

#![warn(missing_docs)]

use std::process::ExitCode;

use clap::Parser;
use localrepo::cli::{self, Args};

//================================================================================================
// Functions
//================================================================================================

fn main() -> ExitCode {
    let argv = match cli::change_directory() {
        Ok(argv) => argv,
        Err(e) => {
            // the subscriber is not installed yet
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        },
    };
    let args = Args::parse_from(argv);
    let _guard = cli::init_global_subscriber(args.log());

    if let Err(e) = cli::run(args) {
        localrepo::fatal!(e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
