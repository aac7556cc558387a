use std::mem;

use log::trace;

use crate::regex::compiler::{Next, Nfa, State, StateId};

/// The set of states active at one position of the subject.
///
/// Only character consuming states are kept; splits are expanded on
/// insertion and reaching the accepting marker just raises a flag. Every
/// state is visited at most once per position, which keeps cycles made of
/// splits from looping forever.
#[derive(Debug)]
struct Frontier {
    states: Vec<StateId>,
    visited: Vec<bool>,
    accepting: bool,
}

impl Frontier {
    fn new(len: usize) -> Self {
        Frontier {
            states: Vec::new(),
            visited: vec![false; len],
            accepting: false,
        }
    }

    fn clear(&mut self) {
        self.states.clear();
        self.visited.fill(false);
        self.accepting = false;
    }

    fn add(&mut self, nfa: &Nfa, next: Next) {
        let mut pending = vec![next];
        while let Some(next) = pending.pop() {
            match next {
                Next::Match => self.accepting = true,
                Next::State(id) => {
                    if mem::replace(&mut self.visited[id.index()], true) {
                        continue;
                    }
                    match &nfa[id] {
                        State::Basic { .. } => self.states.push(id),
                        State::Split { outs: [first, second] } => {
                            pending.push(*second);
                            pending.push(*first);
                        }
                    }
                }
                Next::Dangling => debug_assert!(false, "unwired edge in a compiled automaton"),
            }
        }
    }

    /// Fills `into` with the states reached from this frontier by consuming `c`.
    fn step(&self, nfa: &Nfa, c: char, into: &mut Frontier) {
        into.clear();
        for &id in &self.states {
            if let State::Basic { test, out } = &nfa[id] {
                if test.matches(c) {
                    into.add(nfa, *out);
                }
            }
        }
    }
}

/// Simulates `nfa` over `subject` and tells whether it ends in the accepting
/// marker once every character has been consumed.
pub fn run(nfa: &Nfa, subject: &str) -> bool {
    let mut current = Frontier::new(nfa.len());
    let mut next = Frontier::new(nfa.len());
    current.add(nfa, nfa.start());

    for (pos, c) in subject.chars().enumerate() {
        if current.states.is_empty() {
            trace!("frontier died before position {pos}");
            return false;
        }
        current.step(nfa, c, &mut next);
        mem::swap(&mut current, &mut next);
        trace!("after {c:?} at {pos}: {} active states", current.states.len());
    }

    current.accepting
}
