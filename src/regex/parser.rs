use std::mem;
use std::str::Chars;

use crate::regex::ast::{Atom, Literal, Operator, Range, Token};
use crate::regex::error::MalformedRegex;

/// Transforms a pattern into its postfix token sequence.
///
/// Unless the pattern is explicitly anchored with a leading `^` or a
/// trailing `$`, it is wrapped in `.*` on that side so the resulting
/// automaton searches the whole subject instead of matching it exactly.
pub fn parse_regex(pattern: &str) -> Result<Vec<Token>, MalformedRegex> {
    if trailing_backslashes(pattern) % 2 == 1 {
        return Err(MalformedRegex::TrailingEscape);
    }
    to_postfix(&add_anchors(pattern))
}

pub fn add_anchors(pattern: &str) -> String {
    let mut anchored = match pattern.strip_prefix('^') {
        Some(rest) => rest.to_string(),
        None => format!(".*{pattern}"),
    };
    if ends_with_anchor(&anchored) {
        anchored.pop();
    } else {
        anchored.push_str(".*");
    }
    anchored
}

// A `$` preceded by an odd run of backslashes is an escaped literal.
fn ends_with_anchor(pattern: &str) -> bool {
    let Some(rest) = pattern.strip_suffix('$') else {
        return false;
    };
    trailing_backslashes(rest) % 2 == 0
}

fn trailing_backslashes(s: &str) -> usize {
    s.chars().rev().take_while(|&c| c == '\\').count()
}

/// Accumulates the postfix sequence for one nesting level.
///
/// Atoms are joined lazily: a `Concatenation` is only emitted once a third
/// atom shows up, so a postfix operator always binds to the most recent atom.
#[derive(Debug, Default)]
struct Builder {
    stack: Vec<Token>,
    natoms: usize,
    nalt: usize,
    caret: bool,
}

impl Builder {
    fn make_room(&mut self) {
        if self.natoms > 1 {
            self.stack.push(Token::Concatenation);
            self.natoms -= 1;
        }
    }

    fn push_literal(&mut self, literal: Literal) {
        let negate = mem::take(&mut self.caret);
        self.push_atom(Atom::Literal(literal.negated(negate)));
    }

    fn push_range(&mut self, mut range: Range) {
        range.negate ^= mem::take(&mut self.caret);
        self.push_atom(Atom::Range(range));
    }

    fn push_atom(&mut self, atom: Atom) {
        self.make_room();
        self.stack.push(atom.into());
        self.natoms += 1;
    }

    // A group's sequence always reduces to a single fragment.
    fn push_group(&mut self, tokens: Vec<Token>) {
        self.make_room();
        self.stack.extend(tokens);
        self.natoms += 1;
    }

    fn push_operator(&mut self, op: Operator) -> Result<(), MalformedRegex> {
        if self.natoms == 0 {
            return Err(MalformedRegex::NothingToRepeat(op.as_char()));
        }
        if self.stack.last().is_some_and(Token::is_operator) {
            return Err(MalformedRegex::RepeatedOperator(op.as_char()));
        }
        self.stack.push(op.into());
        Ok(())
    }

    fn alternate(&mut self) -> Result<(), MalformedRegex> {
        if self.natoms == 0 {
            return Err(MalformedRegex::EmptyAlternative);
        }
        for _ in 1..self.natoms {
            self.stack.push(Token::Concatenation);
        }
        self.natoms = 0;
        self.nalt += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Token>, MalformedRegex> {
        if self.nalt > 0 && self.natoms == 0 {
            return Err(MalformedRegex::EmptyAlternative);
        }
        if self.natoms > 1 {
            self.stack.push(Token::Concatenation);
        }
        for _ in 0..self.nalt {
            self.stack.push(Token::Disjunction);
        }
        Ok(self.stack)
    }
}

fn to_postfix(pattern: &str) -> Result<Vec<Token>, MalformedRegex> {
    let mut builder = Builder::default();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or(MalformedRegex::TrailingEscape)?;
                builder.push_literal(Literal::new(escaped));
            }
            '[' => {
                let buffer = collect_brackets(&mut chars)?;
                builder.push_range(make_range(&buffer));
            }
            '(' => {
                // Anchors are only stripped at the top level.
                let group = collect_group(&mut chars)?;
                let tokens = to_postfix(&group)?;
                if tokens.is_empty() {
                    return Err(MalformedRegex::EmptyGroup);
                }
                builder.push_group(tokens);
            }
            ')' => return Err(MalformedRegex::UnopenedGroup),
            '^' => builder.caret = true,
            '|' => builder.alternate()?,
            '.' => builder.push_literal(Literal::wildcard()),
            c => match Operator::from_char(c) {
                Some(op) => builder.push_operator(op)?,
                None => builder.push_literal(Literal::new(c)),
            },
        }
    }

    builder.finish()
}

fn collect_brackets(chars: &mut Chars<'_>) -> Result<Vec<char>, MalformedRegex> {
    let mut buffer = Vec::new();
    loop {
        match chars.next() {
            Some(']') => return Ok(buffer),
            Some('\\') => return Err(MalformedRegex::EscapeInBrackets),
            Some(c) => buffer.push(c),
            None => return Err(MalformedRegex::UnclosedBrackets),
        }
    }
}

/// Collects the raw text of a group up to its matching `)`.
///
/// Escaped characters and bracket expressions are copied verbatim and do
/// not count towards the nesting depth.
fn collect_group(chars: &mut Chars<'_>) -> Result<String, MalformedRegex> {
    let mut buffer = String::new();
    let mut depth = 1;
    let mut in_brackets = false;

    while let Some(c) = chars.next() {
        buffer.push(c);
        if in_brackets {
            in_brackets = c != ']';
            continue;
        }
        match c {
            '\\' => buffer.extend(chars.next()),
            '[' => in_brackets = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    buffer.pop();
                    return Ok(buffer);
                }
            }
            _ => {}
        }
    }
    Err(MalformedRegex::UnclosedGroup)
}

/// Builds a range from the raw contents of a bracket expression. A leading
/// `^` negates it.
pub fn make_range(buffer: &[char]) -> Range {
    let (negate, rest) = match buffer.split_first() {
        Some((&'^', rest)) => (true, rest),
        _ => (false, buffer),
    };
    let mut range = Range::new(negate);
    for c in expand(rest) {
        range.add_char(c);
    }
    range
}

/// Expands `x-y` ranges inside a bracket expression.
///
/// Characters go through a three character window; a window whose middle
/// character is `-` becomes the inclusive range between its ends (nothing
/// when the start is past the end), otherwise its first character is emitted
/// as is.
pub fn expand(buffer: &[char]) -> Vec<char> {
    let mut window: Vec<char> = Vec::with_capacity(3);
    let mut result = Vec::new();

    for &c in buffer {
        window.push(c);
        if window.len() < 3 {
            continue;
        }
        if window[1] == '-' {
            let (start, end) = (window[0] as u32, window[2] as u32);
            result.extend((start..=end).filter_map(char::from_u32));
            window.clear();
        } else {
            result.push(window.remove(0));
        }
    }
    result.extend(window);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // `.` stands for Concatenation and `|` for Disjunction.
    fn postfix(s: &str) -> Vec<Token> {
        s.chars()
            .map(|c| match c {
                '.' => Token::Concatenation,
                '|' => Token::Disjunction,
                c => match Operator::from_char(c) {
                    Some(op) => Token::Operator(op),
                    None => Token::literal(c),
                },
            })
            .collect()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn expand_single_char() {
        assert_eq!(expand(&chars("a")), chars("a"));
    }

    #[test]
    fn expand_simple_range() {
        assert_eq!(expand(&chars("a-c")), chars("abc"));
    }

    #[test]
    fn expand_mixed() {
        assert_eq!(expand(&chars("abx-z42")), chars("abxyz42"));
        assert_eq!(expand(&chars("x-zab")), chars("xyzab"));
    }

    #[test]
    fn expand_drops_backwards_range() {
        assert_eq!(expand(&['a', 'b', '-', '.']), vec!['a']);
        assert_eq!(expand(&chars("z-a")), Vec::<char>::new());
    }

    #[test]
    fn expand_trailing_dash_is_literal() {
        assert_eq!(expand(&chars("a-")), chars("a-"));
        assert_eq!(expand(&chars("-a")), chars("-a"));
    }

    #[test]
    fn make_range_with_caret() {
        let range = make_range(&chars("^a-c"));
        assert!(range.negate);
        assert_eq!(range, "abc".chars().collect::<Range>());

        let range = make_range(&chars("a^"));
        assert!(!range.negate);
        assert!(range.matches('^'));
    }

    #[test]
    fn make_range_empty() {
        assert!(make_range(&[]).chars.is_empty());
        assert!(make_range(&['^']).negate);
    }

    #[test]
    fn anchors() {
        assert_eq!(add_anchors("abc"), ".*abc.*");
        assert_eq!(add_anchors("^abc"), "abc.*");
        assert_eq!(add_anchors("abc$"), ".*abc");
        assert_eq!(add_anchors("^abc$"), "abc");
        assert_eq!(add_anchors(""), ".*.*");
        assert_eq!(add_anchors("^$"), "");
    }

    #[test]
    fn escaped_dollar_is_not_an_anchor() {
        assert_eq!(add_anchors(r"^a\$"), r"a\$.*");
        assert_eq!(add_anchors(r"^a\\$"), r"a\\");
    }

    #[test]
    fn plus_operator_only() {
        assert_eq!(to_postfix("+"), Err(MalformedRegex::NothingToRepeat('+')));
        assert!(parse_regex("+").is_err());
    }

    #[test]
    fn stacked_operators() {
        assert!(parse_regex("+++").is_err());
        assert!(parse_regex("???+*+++**?").is_err());
        assert!(parse_regex("a+???a+bc**").is_err());
        assert_eq!(to_postfix("a+?"), Err(MalformedRegex::RepeatedOperator('?')));
    }

    #[test]
    fn single_character() {
        assert_eq!(parse_regex("^a$").unwrap(), postfix("a"));
    }

    #[test]
    fn concatenation() {
        assert_eq!(parse_regex("^ab$").unwrap(), postfix("ab."));
        assert_eq!(parse_regex("^abc$").unwrap(), postfix("ab.c."));
        assert_eq!(parse_regex("^abcd$").unwrap(), postfix("ab.c.d."));
    }

    #[test]
    fn operators() {
        assert_eq!(parse_regex("^a+$").unwrap(), postfix("a+"));
        assert_eq!(parse_regex("^a*$").unwrap(), postfix("a*"));
        assert_eq!(parse_regex("^a?$").unwrap(), postfix("a?"));
    }

    #[test]
    fn operators_in_the_middle() {
        assert_eq!(parse_regex("^ab+c$").unwrap(), postfix("ab+.c."));
        assert_eq!(parse_regex("^ab*c$").unwrap(), postfix("ab*.c."));
        assert_eq!(parse_regex("^ab?c$").unwrap(), postfix("ab?.c."));
        assert_eq!(parse_regex("^a+b+c+$").unwrap(), postfix("a+b+.c+."));
    }

    #[test]
    fn groups() {
        assert_eq!(parse_regex("^a(b)$").unwrap(), postfix("ab."));
        assert_eq!(parse_regex("^a(bc)+$").unwrap(), postfix("abc.+."));
        assert_eq!(parse_regex("^a(b+(cd)+)$").unwrap(), postfix("ab+cd.+.."));
    }

    #[test]
    fn incorrect_expression_in_group() {
        assert_eq!(
            parse_regex("^a(+++)b$"),
            Err(MalformedRegex::NothingToRepeat('+'))
        );
    }

    #[test]
    fn alternation() {
        assert_eq!(parse_regex("^a|b$").unwrap(), postfix("ab|"));
        assert_eq!(parse_regex("^a+|b+$").unwrap(), postfix("a+b+|"));
        assert_eq!(parse_regex("^a|b|c$").unwrap(), postfix("abc||"));
        assert_eq!(
            parse_regex("^(abc)|(cde)$").unwrap(),
            postfix("ab.c.cd.e.|")
        );
    }

    #[test]
    fn alternation_without_operands() {
        assert_eq!(to_postfix("|a"), Err(MalformedRegex::EmptyAlternative));
        assert_eq!(to_postfix("a||b"), Err(MalformedRegex::EmptyAlternative));
        assert_eq!(to_postfix("(a|)b"), Err(MalformedRegex::EmptyAlternative));
    }

    #[test]
    fn unanchored_pattern_is_wrapped() {
        let any = || Token::Atom(Atom::Literal(Literal::wildcard()));
        let star = || Token::Operator(Operator::ZeroOrMore);
        assert_eq!(
            parse_regex("a").unwrap(),
            vec![
                any(),
                star(),
                Token::literal('a'),
                Token::Concatenation,
                any(),
                star(),
                Token::Concatenation,
            ]
        );
    }

    #[test]
    fn escape() {
        assert_eq!(
            parse_regex(r"^a\+$").unwrap(),
            vec![Token::literal('a'), Token::literal('+'), Token::Concatenation]
        );
        assert_eq!(parse_regex(r"^\(\)$").unwrap(), vec![
            Token::literal('('),
            Token::literal(')'),
            Token::Concatenation,
        ]);
        assert_eq!(
            parse_regex(r"^\.$").unwrap(),
            vec![Token::literal('.')]
        );
    }

    #[test]
    fn caret_negates_next_atom() {
        let tokens = parse_regex("^a^bc$").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::literal('a'),
                Token::Atom(Atom::Literal(Literal::new('b').negated(true))),
                Token::Concatenation,
                Token::literal('c'),
                Token::Concatenation,
            ]
        );
    }

    #[test]
    fn caret_before_group_waits_for_next_atom() {
        assert_eq!(
            parse_regex("^x^(a)b$").unwrap(),
            vec![
                Token::literal('x'),
                Token::literal('a'),
                Token::Concatenation,
                Token::Atom(Atom::Literal(Literal::new('b').negated(true))),
                Token::Concatenation,
            ]
        );
    }

    #[test]
    fn trailing_caret_is_dropped() {
        assert_eq!(parse_regex("^a^$").unwrap(), vec![Token::literal('a')]);
        assert_eq!(parse_regex("^(a^)$").unwrap(), vec![Token::literal('a')]);
    }

    #[test]
    fn caret_toggles_bracket_negation() {
        let tokens = parse_regex("^^[^a]$").unwrap();
        let [Token::Atom(Atom::Range(range))] = tokens.as_slice() else {
            panic!("expected a single range, got {tokens:?}");
        };
        assert!(!range.negate);
        assert!(range.matches('a'));
    }

    #[test]
    fn brackets() {
        let tokens = parse_regex("^x[a-c]$").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::literal('x'),
                Token::Atom(Atom::Range("abc".chars().collect())),
                Token::Concatenation,
            ]
        );
    }

    #[test]
    fn backslash_in_brackets() {
        assert_eq!(
            parse_regex(r"[ab-\.]+"),
            Err(MalformedRegex::EscapeInBrackets)
        );
    }

    #[test]
    fn unterminated_input() {
        assert_eq!(parse_regex("a(bc"), Err(MalformedRegex::UnclosedGroup));
        assert_eq!(parse_regex("a(b(c)"), Err(MalformedRegex::UnclosedGroup));
        assert_eq!(parse_regex("[abc"), Err(MalformedRegex::UnclosedBrackets));
        assert_eq!(parse_regex(r"abc\"), Err(MalformedRegex::TrailingEscape));
        assert!(parse_regex(r"abc\\").is_ok());
        assert_eq!(to_postfix(r"abc\"), Err(MalformedRegex::TrailingEscape));
    }

    #[test]
    fn unopened_group() {
        assert_eq!(parse_regex("ab)"), Err(MalformedRegex::UnopenedGroup));
    }

    #[test]
    fn empty_group() {
        assert_eq!(parse_regex("a()b"), Err(MalformedRegex::EmptyGroup));
        assert_eq!(parse_regex("a(^)b"), Err(MalformedRegex::EmptyGroup));
    }

    #[test]
    fn group_keeps_escapes_and_brackets_together() {
        assert_eq!(
            parse_regex(r"^(\))$").unwrap(),
            vec![Token::literal(')')]
        );
        assert_eq!(
            parse_regex("^([)])$").unwrap(),
            vec![Token::Atom(Atom::Range(")".chars().collect()))]
        );
    }
}
