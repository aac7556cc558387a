//! A POSIX-like regular expression matcher.
//!
//! Patterns are turned into a postfix token sequence, compiled into a
//! Thompson NFA and simulated over the subject one character at a time.
//!
//! ```
//! use postfix_regex::is_match;
//!
//! assert_eq!(is_match("a(bc)+d", "abcbcd"), Ok(true));
//! assert_eq!(is_match("^abc", "zabc"), Ok(false));
//! assert!(is_match("a++", "a").is_err());
//! ```

pub mod app;
pub mod cli;
pub mod output;
pub mod regex;

pub use regex::{MalformedRegex, Regex, is_match};
