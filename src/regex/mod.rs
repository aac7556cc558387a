pub mod ast;
pub mod compiler;
pub mod error;
pub mod matcher;
pub mod parser;

use log::debug;

pub use ast::Token;
pub use compiler::{Nfa, compile};
pub use error::MalformedRegex;
pub use matcher::run;
pub use parser::parse_regex;

use ast::Postfix;

/// A pattern parsed and compiled into an automaton.
///
/// Matching never mutates the automaton, so one `Regex` can be shared and
/// reused for any number of subjects.
#[derive(Debug, Clone)]
pub struct Regex {
    nfa: Nfa,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, MalformedRegex> {
        let tokens = parse_regex(pattern)?;
        debug!("postfix form of {pattern:?}: {}", Postfix(&tokens));
        let nfa = compile(&tokens);
        debug!("compiled {pattern:?} into {} states", nfa.len());
        Ok(Regex { nfa })
    }

    pub fn is_match(&self, subject: &str) -> bool {
        run(&self.nfa, subject)
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }
}

/// Tells whether `subject` matches `pattern`, building a fresh automaton.
pub fn is_match(pattern: &str, subject: &str) -> Result<bool, MalformedRegex> {
    Ok(Regex::new(pattern)?.is_match(subject))
}
