use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Log the full point before it is written.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Read settings from a file of `KEY=value` lines instead of only the environment.
    ///
    /// The file has no `[section]` headers. Keys that are not in the file are still read from
    /// the environment.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep running, taking a measurement every `TEST_INTERVAL` seconds.
    ///
    /// The process still exits on the first failure so that a supervisor can restart it.
    #[arg(long, default_value = "false")]
    pub service: bool,
}
