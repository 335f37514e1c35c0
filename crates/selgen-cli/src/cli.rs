use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "selgen.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Gen,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Gen(GenArgs),
    Init(InitArgs),
}

#[derive(Debug, Clone)]
pub struct GenArgs {
    pub config: PathBuf,
    pub dry_run: bool,
    pub check: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "gen" => parse_gen(it.map(|s| s.as_str())),
        "init" => parse_init(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_gen<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut dry_run = false;
    let mut check = false;
    let mut verbose = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Gen)),
            "--config" => config = parse_config_value(it.next())?,
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--dry-run" => dry_run = true,
            "--check" => check = true,
            "-v" | "--verbose" => verbose = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if dry_run && check {
        anyhow::bail!("--dry-run and --check cannot be used together");
    }

    Ok(Command::Gen(GenArgs {
        config,
        dry_run,
        check,
        verbose,
    }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "--config" => config = parse_config_value(it.next())?,
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

fn parse_config_value(v: Option<&str>) -> anyhow::Result<PathBuf> {
    let Some(v) = v else {
        anyhow::bail!("--config requires a value");
    };
    Ok(PathBuf::from(v))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
selgen - MyBatis mapper generator with selective column inserts

USAGE:
  selgen <COMMAND> [OPTIONS]

COMMANDS:
  gen                   Generate model classes, mapper XML and mapper interfaces
  init                  Write a selgen.toml template

Run `selgen <command> --help` for more."
            );
        }
        HelpTopic::Gen => {
            println!(
                "\
USAGE:
  selgen gen [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: selgen.toml)
  --dry-run             Print files that would change, write nothing
  --check               Fail if any generated file is out of date
  -v, --verbose         Log debug events (RUST_LOG overrides)
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  selgen init [OPTIONS]

OPTIONS:
  --config <FILE>       Path of the template to write (default: selgen.toml)
  -h, --help            Print help"
            );
        }
    }
}
