mod aggregate;
mod branch;
mod cache;
mod cli;
mod content_dates;
mod db;
mod error;
mod filename_dates;
mod fmt;
mod loader;
mod models;
mod report;
mod settings;
mod sources;
mod summary;

use clap::Parser;

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { data_dir, roster } => cli::init::run(data_dir, roster),
        Commands::Status => cli::status::run(),
        Commands::Sources => cli::sources::run(),
        Commands::Summary {
            refresh,
            format,
            output,
            save,
        } => cli::summary::run(refresh, &format, output, save),
        Commands::Branch { name, source } => cli::branch::run(&name, source.as_deref()),
        Commands::Watch => cli::watch::run(),
        Commands::History { branch, limit } => cli::history::run(branch.as_deref(), limit),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
