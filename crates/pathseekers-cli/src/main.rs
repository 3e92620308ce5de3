//! Pathseekers CLI - serve the launcher page and check module builds.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    unreachable_pub
)]

mod check;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pathseekers")]
#[command(about = "Launcher tooling for the A* vs JPS benchmark module")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the launcher page and module build
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory to serve (default: www)
        #[arg(short, long, default_value = "www")]
        dir: PathBuf,
    },

    /// Check a launcher manifest and the build it points at
    Check {
        /// Path to manifest file
        #[arg(default_value = "crates/pathseekers/assets/launcher.yaml")]
        manifest: PathBuf,

        /// Directory build URLs are resolved against
        #[arg(short, long, default_value = "www")]
        root: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, dir } => serve::run(port, &dir),
        Commands::Check { manifest, root } => check::run(&manifest, &root),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
