mod app;
mod catalog;
mod cli;
mod config;
mod core;
mod matcher;
mod output;
mod scan;
mod utils;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::args::Cli::parse();
    if let Err(err) = app::run(cli).await {
        eprintln!("fatal: {:#}", err);
        std::process::exit(1);
    }
}
