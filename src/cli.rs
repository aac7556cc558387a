use std::ffi::OsString;

use clap::{Command, arg, command};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pattern: String,
    pub subject: String,
}

pub fn cli() -> Command {
    command!()
        .about("Match a string against a POSIX-like regular expression")
        .arg(
            arg!(<PATTERN>)
                .help("A POSIX-like regular expression")
                .allow_hyphen_values(true),
        )
        .arg(
            arg!(<STRING>)
                .help("A string to match")
                .allow_hyphen_values(true),
        )
}

pub fn parse_args<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut matches = cli().try_get_matches_from(args)?;
    // Both positionals are required, clap rejects the command line without them.
    let pattern = matches.remove_one::<String>("PATTERN").unwrap_or_default();
    let subject = matches.remove_one::<String>("STRING").unwrap_or_default();
    Ok(Config { pattern, subject })
}
