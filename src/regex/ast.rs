use std::collections::BTreeSet;
use std::fmt;

/// A single character test.
///
/// `wildcard` matches any character (the unescaped `.`), `negate` inverts
/// the outcome of the test (an interior `^` before the character).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub c: char,
    pub negate: bool,
    pub wildcard: bool,
}

impl Literal {
    pub fn new(c: char) -> Self {
        Literal {
            c,
            negate: false,
            wildcard: false,
        }
    }

    pub fn wildcard() -> Self {
        Literal {
            c: '.',
            negate: false,
            wildcard: true,
        }
    }

    pub fn negated(self, negate: bool) -> Self {
        Literal { negate, ..self }
    }

    pub fn matches(&self, c: char) -> bool {
        let found = self.wildcard || self.c == c;
        found != self.negate
    }
}

/// A set of acceptable characters, built from a bracket expression.
#[derive(Debug, Clone, Default, Eq)]
pub struct Range {
    pub chars: BTreeSet<char>,
    pub negate: bool,
}

impl Range {
    pub fn new(negate: bool) -> Self {
        Range {
            chars: BTreeSet::new(),
            negate,
        }
    }

    pub fn add_char(&mut self, c: char) {
        self.chars.insert(c);
    }

    pub fn matches(&self, c: char) -> bool {
        self.chars.contains(&c) != self.negate
    }
}

// Ranges compare by their character sets only.
impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars
    }
}

impl FromIterator<char> for Range {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Range {
            chars: iter.into_iter().collect(),
            negate: false,
        }
    }
}

/// Anything that consumes exactly one input character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Literal(Literal),
    Range(Range),
}

impl Atom {
    pub fn matches(&self, c: char) -> bool {
        match self {
            Atom::Literal(literal) => literal.matches(c),
            Atom::Range(range) => range.matches(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    OneOrMore,  // +
    ZeroOrMore, // *
    ZeroOrOne,  // ?
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::OneOrMore),
            '*' => Some(Operator::ZeroOrMore),
            '?' => Some(Operator::ZeroOrOne),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::OneOrMore => '+',
            Operator::ZeroOrMore => '*',
            Operator::ZeroOrOne => '?',
        }
    }
}

/// One entry of a postfix sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(Atom),
    Operator(Operator),
    Concatenation, // join the two previous fragments
    Disjunction,   // alternate between the two previous fragments
}

impl Token {
    pub fn literal(c: char) -> Self {
        Token::Atom(Atom::Literal(Literal::new(c)))
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Operator(_))
    }
}

impl From<Atom> for Token {
    fn from(atom: Atom) -> Self {
        Token::Atom(atom)
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let caret = if self.negate { "^" } else { "" };
        if self.wildcard {
            write!(f, "Character<{caret}any>")
        } else {
            write!(f, "Character<{caret}{}>", self.c)
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            f.write_str("^")?;
        }
        f.write_str("Range<")?;
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Literal(literal) => literal.fmt(f),
            Atom::Range(range) => range.fmt(f),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(atom) => atom.fmt(f),
            Token::Operator(op) => write!(f, "Operator<{}>", op.as_char()),
            Token::Concatenation => f.write_str("Concatenation"),
            Token::Disjunction => f.write_str("Disjunction"),
        }
    }
}

/// Renders a postfix sequence on one line, for log output.
pub struct Postfix<'a>(pub &'a [Token]);

impl fmt::Display for Postfix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            token.fmt(f)?;
        }
        Ok(())
    }
}
