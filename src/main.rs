//! conf-merge CLI
//!
//! Entry point for the `conf-merge` command-line tool.

use clap::{ArgAction, Parser};
use conf_merge::{AssignmentSet, MergeConfig, MergeError};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use tracing::Level;

const PROGRAM: &str = "conf-merge";

#[derive(Parser)]
#[command(name = PROGRAM, disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Print usage and exit
    #[arg(short = 'h')]
    help: bool,

    /// File to merge into (default: /etc/sysctl.conf)
    #[arg(long, short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Do not warn about names unknown to the running system
    #[arg(long, short = 'n')]
    no_probe: bool,

    /// Print the merged file to stdout instead of replacing it
    #[arg(long)]
    dry_run: bool,

    /// Print a JSON report of what changed
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Settings as name=value
    assignments: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => usage(),
    };
    if cli.help || cli.assignments.is_empty() {
        usage();
    }
    if cli.assignments.iter().any(|a| !a.contains('=')) {
        usage();
    }

    init_logging(cli.verbose);

    let mut config = match cli.file {
        Some(path) => MergeConfig::for_target(path),
        None => MergeConfig::default(),
    };
    config.probe = !cli.no_probe;
    config.dry_run = cli.dry_run;

    let probe = config.namespace_probe();
    let mut set = match AssignmentSet::from_tokens(&cli.assignments, probe.as_ref()) {
        Ok(set) => set,
        Err(e) => fail(&e),
    };

    let outcome = match conf_merge::merge(&config, &mut set) {
        Ok(outcome) => outcome,
        Err(e) => fail(&e),
    };

    if cli.json {
        match outcome.report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}: error serializing report: {}", PROGRAM, e);
                process::exit(1);
            }
        }
    } else if let Some(content) = outcome.preview {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(&content).and_then(|()| stdout.flush()) {
            eprintln!("{}: error writing output: {}", PROGRAM, e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

fn fail(err: &MergeError) -> ! {
    eprintln!("{}: {}", PROGRAM, err);
    process::exit(1);
}

fn usage() -> ! {
    eprintln!("Usage: {} -h", PROGRAM);
    eprintln!("       {} [-n] [--dry-run] [--json] [-f file] var1=val1 var2=val2 ...", PROGRAM);
    process::exit(1);
}
