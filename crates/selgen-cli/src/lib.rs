mod cli;
mod config;
mod generate;
mod init;
mod write;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Init(args) => init::run(args),
        cli::Command::Gen(args) => {
            init_logging(args.verbose);
            generate::run(args)
        }
    }
}

/// `RUST_LOG` wins over the default level; `--verbose` only raises the default.
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
