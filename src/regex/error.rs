use thiserror::Error;

/// The pattern could not be turned into a postfix sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRegex {
    #[error("operator '{0}' has nothing to repeat")]
    NothingToRepeat(char),

    #[error("operator '{0}' follows another operator")]
    RepeatedOperator(char),

    #[error("alternation is missing an operand")]
    EmptyAlternative,

    #[error("backslashes are not allowed in square brackets")]
    EscapeInBrackets,

    #[error("empty group")]
    EmptyGroup,

    #[error("unclosed group")]
    UnclosedGroup,

    #[error("unopened group")]
    UnopenedGroup,

    #[error("unclosed square brackets")]
    UnclosedBrackets,

    #[error("trailing backslash")]
    TrailingEscape,
}
