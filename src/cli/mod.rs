//! Command-line front end over snapshot files.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::core::services::ServiceError;
use crate::errors::EngineError;

pub type CommandResult = Result<(), CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Report,
    Upcoming,
    Json,
    Version,
    Help,
}

impl Command {
    fn parse(name: &str) -> Result<Self, CliError> {
        match name {
            "report" => Ok(Command::Report),
            "upcoming" => Ok(Command::Upcoming),
            "json" => Ok(Command::Json),
            "version" => Ok(Command::Version),
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(CliError::Usage(format!("unknown command `{}`", other))),
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub snapshot: Option<PathBuf>,
    pub date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub per_payer: bool,
    pub limit: Option<usize>,
    pub plain: bool,
}

impl Invocation {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let command = match args.next() {
            Some(name) => Command::parse(&name)?,
            None => Command::Help,
        };
        let mut invocation = Invocation {
            command,
            snapshot: None,
            date: None,
            currency: None,
            per_payer: false,
            limit: None,
            plain: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--date" => {
                    let raw = required_value(&mut args, "--date")?;
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| EngineError::InvalidDate(raw.clone()))?;
                    invocation.date = Some(date);
                }
                "--currency" => invocation.currency = Some(required_value(&mut args, "--currency")?),
                "--limit" => {
                    let raw = required_value(&mut args, "--limit")?;
                    let limit = raw
                        .parse()
                        .map_err(|_| CliError::Usage(format!("invalid --limit `{}`", raw)))?;
                    invocation.limit = Some(limit);
                }
                "--per-payer" => invocation.per_payer = true,
                "--plain" => invocation.plain = true,
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option `{}`", flag)));
                }
                _ if invocation.snapshot.is_none() => invocation.snapshot = Some(PathBuf::from(&arg)),
                _ => return Err(CliError::Usage(format!("unexpected argument `{}`", arg))),
            }
        }

        Ok(invocation)
    }
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::Usage(format!("{} requires a value", flag)))
}

/// Entry point used by the binary.
pub fn run_cli<I, S>(args: I) -> CommandResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let invocation = Invocation::parse(args)?;
    output::set_plain(invocation.plain);
    commands::dispatch(&invocation)
}

pub fn usage() -> &'static str {
    "Usage: subscription_core_cli <command> [snapshot.json] [options]\n\
     Commands:\n  \
     report     Totals, breakdowns and budget usage\n  \
     upcoming   Subscriptions ordered by next payment\n  \
     json       Full report as JSON\n  \
     version    Build metadata\n\
     Options:\n  \
     --date YYYY-MM-DD   Reference date (defaults to today)\n  \
     --currency CODE     Report currency (defaults to config)\n  \
     --per-payer         Split shared subscriptions across payers\n  \
     --limit N           Rows shown by `upcoming`\n  \
     --plain             Disable colors"
}
