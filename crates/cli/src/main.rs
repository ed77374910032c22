//! Entry point for the `arranger` command line.

use arranger::args::{parse_cli, Commands};
use arranger::run::{handle_config, run_entries};

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Entries(args) => run_entries(args),
        Commands::Config(cmd) => handle_config(cmd),
    }
}
