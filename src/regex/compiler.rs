use std::fmt;
use std::ops::Index;

use crate::regex::ast::{Atom, Operator, Token};

/// Index of a state in [`Nfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Target of an outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Next {
    /// Not wired yet. Never present in a finished automaton.
    Dangling,
    State(StateId),
    /// The shared accepting marker.
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Consumes one character accepted by `test`, then follows `out`.
    Basic { test: Atom, out: Next },
    /// Epsilon branch to both outputs.
    Split { outs: [Next; 2] },
}

/// An output slot of a state still waiting for its successor.
#[derive(Debug, Clone, Copy)]
struct DanglingArrow {
    state: StateId,
    slot: usize,
}

/// A partially built piece of the automaton.
#[derive(Debug)]
struct Fragment {
    start: StateId,
    dangling: Vec<DanglingArrow>,
}

/// A compiled automaton: an arena of states plus the edge to start from.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: Next,
}

impl Nfa {
    pub fn start(&self) -> Next {
        self.start
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }
}

impl Index<StateId> for Nfa {
    type Output = State;

    fn index(&self, id: StateId) -> &State {
        &self.states[id.0]
    }
}

#[derive(Debug, Default)]
struct Compiler {
    states: Vec<State>,
    frags: Vec<Fragment>,
}

impl Compiler {
    fn state(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(state);
        id
    }

    fn split(&mut self, first: Next, second: Next) -> StateId {
        self.state(State::Split {
            outs: [first, second],
        })
    }

    fn pop(&mut self) -> Fragment {
        self.frags
            .pop()
            .expect("every postfix operator has its operands on the stack")
    }

    /// Wires every dangling arrow to `next`.
    fn connect(&mut self, arrows: Vec<DanglingArrow>, next: Next) {
        for arrow in arrows {
            match &mut self.states[arrow.state.0] {
                State::Basic { out, .. } => {
                    debug_assert_eq!(arrow.slot, 0);
                    *out = next;
                }
                State::Split { outs } => outs[arrow.slot] = next,
            }
        }
    }

    fn push_token(&mut self, token: &Token) {
        let frag = match token {
            Token::Atom(atom) => {
                let state = self.state(State::Basic {
                    test: atom.clone(),
                    out: Next::Dangling,
                });
                Fragment {
                    start: state,
                    dangling: vec![DanglingArrow { state, slot: 0 }],
                }
            }
            Token::Concatenation => {
                let right = self.pop();
                let left = self.pop();
                self.connect(left.dangling, Next::State(right.start));
                Fragment {
                    start: left.start,
                    dangling: right.dangling,
                }
            }
            Token::Disjunction => {
                let right = self.pop();
                let mut left = self.pop();
                let split = self.split(Next::State(left.start), Next::State(right.start));
                left.dangling.extend(right.dangling);
                Fragment {
                    start: split,
                    dangling: left.dangling,
                }
            }
            Token::Operator(Operator::OneOrMore) => {
                let frag = self.pop();
                let split = self.split(Next::State(frag.start), Next::Dangling);
                self.connect(frag.dangling, Next::State(split));
                Fragment {
                    start: frag.start,
                    dangling: vec![DanglingArrow {
                        state: split,
                        slot: 1,
                    }],
                }
            }
            Token::Operator(Operator::ZeroOrMore) => {
                let frag = self.pop();
                let split = self.split(Next::State(frag.start), Next::Dangling);
                self.connect(frag.dangling, Next::State(split));
                Fragment {
                    start: split,
                    dangling: vec![DanglingArrow {
                        state: split,
                        slot: 1,
                    }],
                }
            }
            Token::Operator(Operator::ZeroOrOne) => {
                let mut frag = self.pop();
                let split = self.split(Next::State(frag.start), Next::Dangling);
                frag.dangling.push(DanglingArrow {
                    state: split,
                    slot: 1,
                });
                Fragment {
                    start: split,
                    dangling: frag.dangling,
                }
            }
        };
        self.frags.push(frag);
    }

    fn finish(mut self) -> Nfa {
        debug_assert!(
            self.frags.len() <= 1,
            "postfix sequence left {} fragments",
            self.frags.len()
        );
        let start = match self.frags.pop() {
            Some(frag) => {
                self.connect(frag.dangling, Next::Match);
                Next::State(frag.start)
            }
            None => Next::Match,
        };
        Nfa {
            states: self.states,
            start,
        }
    }
}

/// Builds the automaton for a postfix sequence produced by
/// [`parse_regex`](crate::regex::parse_regex).
///
/// An empty sequence yields an automaton that only accepts the empty string.
pub fn compile(tokens: &[Token]) -> Nfa {
    let mut compiler = Compiler::default();
    for token in tokens {
        compiler.push_token(token);
    }
    compiler.finish()
}

impl fmt::Display for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Next::Dangling => f.write_str("?"),
            Next::State(id) => write!(f, "{}", id.0),
            Next::Match => f.write_str("Match"),
        }
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for (id, state) in self.states() {
            match state {
                State::Basic { test, out } => writeln!(f, "{}: {test} -> {out}", id.0)?,
                State::Split { outs: [a, b] } => writeln!(f, "{}: Split -> {a}, {b}", id.0)?,
            }
        }
        Ok(())
    }
}
