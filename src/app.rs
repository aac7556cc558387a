use std::io::Write;

use anyhow::Context;
use log::debug;

use crate::cli::Config;
use crate::output::{PARSE_ERROR, verdict};
use crate::regex::Regex;

pub const EXIT_MATCH: i32 = 0;
pub const EXIT_NO_MATCH: i32 = 1;
pub const EXIT_MALFORMED: i32 = -1;

/// Matches the configured subject and reports the verdict, returning the
/// process exit code.
pub fn run<O: Write, E: Write>(cfg: &Config, out: &mut O, err: &mut E) -> anyhow::Result<i32> {
    let regex = match Regex::new(&cfg.pattern) {
        Ok(regex) => regex,
        Err(reason) => {
            debug!("rejected {:?}: {reason}", cfg.pattern);
            writeln!(err, "{PARSE_ERROR}").context("writing to stderr")?;
            return Ok(EXIT_MALFORMED);
        }
    };

    let matched = regex.is_match(&cfg.subject);
    writeln!(out, "{}", verdict(&cfg.subject, matched)).context("writing to stdout")?;

    Ok(if matched { EXIT_MATCH } else { EXIT_NO_MATCH })
}
