use std::{env, io, process};

use postfix_regex::{app, cli};

// Usage: postfix-regex <pattern> <string>
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = cli::parse_args(env::args_os()).unwrap_or_else(|err| err.exit());
    let code = app::run(&cfg, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    process::exit(code);
}
