/*!
Conjunction (§4.5): every child must accept the *same* final window. Unlike
alternation, a conjunction drives its own shrink loop — when a child only
accepts a shorter span (or asks for backoff), every child already matched
in this round is retracted and the whole round restarts at the reduced
length.
*/

use std::cell::RefCell;

use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::{BuildError, MatchError};
use crate::outcome::MatchOutcome;
use crate::pattern::{Pattern, Prepared};
use crate::sequence::{NamedData, Sequence};

use super::child_label;

/// A set of sub-patterns that must all match the same span.
pub struct Conjunction<S: Sequence> {
    name: Option<String>,
    children: Vec<Pattern<S>>,
}

impl<S: Sequence> Conjunction<S> {
    pub fn new(name: Option<String>, children: Vec<Pattern<S>>) -> Result<Conjunction<S>, BuildError> {
        if children.is_empty() {
            return Err(BuildError::empty_children("conjunction"));
        }
        Ok(Conjunction { name, children })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn children(&self) -> &[Pattern<S>] {
        &self.children
    }

    pub(crate) fn prep(&self, data: &S) -> Result<Option<Prepared<S>>, MatchError> {
        let data_len = data.seq_len();
        let mut children = Vec::with_capacity(self.children.len());
        for child in &self.children {
            match child.prep(data)? {
                Some(p) => children.push(p),
                // every child must be viable or the conjunction can never match.
                None => return Ok(None),
            }
        }
        let min_size = children.iter().map(|p| p.min_size()).max().unwrap_or(0);
        let max_size = children.iter().map(|p| p.max_size(data_len)).min().unwrap_or(0);
        Ok(Some(Prepared::And(AndPrep {
            min_size,
            max_size,
            children,
            last_positive: RefCell::new(Vec::new()),
        })))
    }

    pub(crate) fn apply(
        &self,
        data: &S,
        prep: &AndPrep<S>,
        window: Window,
        captures: &mut CaptureStore,
        subsets: Option<&NamedData<S>>,
        path: &mut Vec<String>,
    ) -> Result<MatchOutcome, MatchError> {
        let mut length = window.length;
        'restart: loop {
            if length < prep.min_size {
                return Ok(MatchOutcome::NoMatch);
            }
            let mut matched_so_far = Vec::with_capacity(self.children.len());
            for (i, child) in self.children.iter().enumerate() {
                let cprep = &prep.children[i];
                let child_window = Window::new(window.left, length);
                path.push(child_label("conjunction", self.name(), i, child));
                let res = child.apply(data, cprep, child_window, captures, subsets, path);
                path.pop();
                match res? {
                    MatchOutcome::Consumed(c) if c == length => {
                        matched_so_far.push(i);
                    }
                    MatchOutcome::ZeroWidth if length == 0 => {
                        matched_so_far.push(i);
                    }
                    MatchOutcome::Consumed(c) => {
                        child.retract(cprep, captures);
                        for &j in matched_so_far.iter().rev() {
                            self.children[j].retract(&prep.children[j], captures);
                        }
                        length = c;
                        continue 'restart;
                    }
                    MatchOutcome::ZeroWidth => {
                        child.retract(cprep, captures);
                        for &j in matched_so_far.iter().rev() {
                            self.children[j].retract(&prep.children[j], captures);
                        }
                        length = 0;
                        continue 'restart;
                    }
                    MatchOutcome::Backoff(d) => {
                        for &j in matched_so_far.iter().rev() {
                            self.children[j].retract(&prep.children[j], captures);
                        }
                        length = length.saturating_sub(d);
                        continue 'restart;
                    }
                    MatchOutcome::NoMatch => {
                        for &j in matched_so_far.iter().rev() {
                            self.children[j].retract(&prep.children[j], captures);
                        }
                        return Ok(MatchOutcome::NoMatch);
                    }
                }
            }
            let outcome_length = if length == 0 { Length::ZeroButTrue } else { Length::Count(length) };
            prep.last_positive
                .replace(vec![MatchRecord::new(window.left, outcome_length); self.children.len()]);
            return Ok(if length == 0 { MatchOutcome::ZeroWidth } else { MatchOutcome::Consumed(length) });
        }
    }

    pub(crate) fn retract(&self, prep: &AndPrep<S>, captures: &mut CaptureStore) {
        for (child, cprep) in self.children.iter().zip(prep.children.iter()).rev() {
            child.retract(cprep, captures);
        }
        prep.last_positive.replace(Vec::new());
    }

    pub(crate) fn positive_matches(&self, prep: &AndPrep<S>) -> Vec<MatchRecord> {
        prep.last_positive.borrow().clone()
    }
}

/// Prep state for [`Conjunction`]: every child necessarily prepped
/// successfully (otherwise the conjunction as a whole can't match).
pub struct AndPrep<S: Sequence> {
    pub(crate) min_size: usize,
    pub(crate) max_size: usize,
    children: Vec<Prepared<S>>,
    last_positive: RefCell<Vec<MatchRecord>>,
}
