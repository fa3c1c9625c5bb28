/*!
Alternation (§4.4): tries each child in order at the *same* `left`, keeping
the first to succeed. A child that reports `Backoff` is retried at
progressively shorter windows before moving on; a child whose `prep`
failed outright is skipped without ever being tried.
*/

use std::cell::Cell;

use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::{BuildError, MatchError};
use crate::outcome::MatchOutcome;
use crate::pattern::{Pattern, Prepared};
use crate::sequence::{NamedData, Sequence};

use super::child_label;

/// An ordered set of alternatives; the first to match at a given `left`
/// wins.
pub struct Alternation<S: Sequence> {
    name: Option<String>,
    children: Vec<Pattern<S>>,
}

impl<S: Sequence> Alternation<S> {
    pub fn new(name: Option<String>, children: Vec<Pattern<S>>) -> Result<Alternation<S>, BuildError> {
        if children.is_empty() {
            return Err(BuildError::empty_children("alternation"));
        }
        Ok(Alternation { name, children })
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
        let mut min_size: Option<usize> = None;
        let mut max_size = 0usize;
        for child in &self.children {
            let prepared = child.prep(data)?;
            if let Some(ref p) = prepared {
                let cmin = p.min_size();
                let cmax = p.max_size(data_len);
                min_size = Some(min_size.map_or(cmin, |m: usize| m.min(cmin)));
                max_size = max_size.max(cmax);
            }
            children.push(prepared);
        }
        if children.iter().all(Option::is_none) {
            return Ok(None);
        }
        Ok(Some(Prepared::Or(OrPrep {
            min_size: min_size.unwrap_or(0),
            max_size,
            children,
            last_success: Cell::new(None),
            last_positive: std::cell::RefCell::new(Vec::new()),
        })))
    }

    pub(crate) fn apply(
        &self,
        data: &S,
        prep: &OrPrep<S>,
        window: Window,
        captures: &mut CaptureStore,
        subsets: Option<&NamedData<S>>,
        path: &mut Vec<String>,
    ) -> Result<MatchOutcome, MatchError> {
        for (i, child) in self.children.iter().enumerate() {
            let Some(cprep) = &prep.children[i] else { continue };
            if cprep.min_size() > window.length {
                continue;
            }
            let cmax = cprep.max_size(data.seq_len());
            let mut r_len = window.length.min(cmax);
            loop {
                if r_len < cprep.min_size() {
                    break;
                }
                let child_window = Window::new(window.left, r_len);
                path.push(child_label("alternation", self.name(), i, child));
                let res = child.apply(data, cprep, child_window, captures, subsets, path);
                path.pop();
                match res? {
                    MatchOutcome::Consumed(k) => {
                        prep.last_success.set(Some(i));
                        prep.last_positive
                            .replace(vec![MatchRecord::new(window.left, Length::Count(k))]);
                        return Ok(MatchOutcome::Consumed(k));
                    }
                    MatchOutcome::ZeroWidth => {
                        prep.last_success.set(Some(i));
                        prep.last_positive
                            .replace(vec![MatchRecord::new(window.left, Length::ZeroButTrue)]);
                        return Ok(MatchOutcome::ZeroWidth);
                    }
                    MatchOutcome::Backoff(d) => {
                        r_len = r_len.saturating_sub(d);
                        continue;
                    }
                    MatchOutcome::NoMatch => break,
                }
            }
        }
        prep.last_success.set(None);
        Ok(MatchOutcome::NoMatch)
    }

    pub(crate) fn retract(&self, prep: &OrPrep<S>, captures: &mut CaptureStore) {
        if let Some(i) = prep.last_success.take() {
            if let Some(cprep) = &prep.children[i] {
                self.children[i].retract(cprep, captures);
            }
        }
        prep.last_positive.replace(Vec::new());
    }

    pub(crate) fn positive_matches(&self, prep: &OrPrep<S>) -> Vec<MatchRecord> {
        prep.last_positive.borrow().clone()
    }
}

/// Prep state for [`Alternation`]: each entry mirrors one child, `None` if
/// that child's own `prep` declined to participate.
pub struct OrPrep<S: Sequence> {
    pub(crate) min_size: usize,
    pub(crate) max_size: usize,
    children: Vec<Option<Prepared<S>>>,
    /// Index of the child that won the most recent successful `apply`, so
    /// an ancestor's `retract` can undo exactly that child's contribution.
    last_success: Cell<Option<usize>>,
    last_positive: std::cell::RefCell<Vec<MatchRecord>>,
}
