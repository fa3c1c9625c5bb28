/*!
Concatenation (§4.6): the hardest algorithm here. Each child is tried
greedily in turn; if a later child can't make room, an earlier child gives
back one element at a time and the whole remainder is retried. The
textbook formulation of this is a recursion over the child list — the §9
redesign note asks for an explicit work-stack instead, so that a
concatenation with a very long child list can't blow the native call
stack. The state machine below is exactly that recursion, unrolled onto a
[`Vec<Frame>`].
*/

use std::cell::RefCell;

use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::{BuildError, MatchError};
use crate::outcome::MatchOutcome;
use crate::pattern::{Pattern, Prepared};
use crate::sequence::{NamedData, Sequence};

use super::child_label;

/// An ordered list of sub-patterns that must all match, back to back.
pub struct Concatenation<S: Sequence> {
    name: Option<String>,
    children: Vec<Pattern<S>>,
}

impl<S: Sequence> Concatenation<S> {
    pub fn new(name: Option<String>, children: Vec<Pattern<S>>) -> Result<Concatenation<S>, BuildError> {
        if children.is_empty() {
            return Err(BuildError::empty_children("concatenation"));
        }
        Ok(Concatenation { name, children })
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
                None => return Ok(None),
            }
        }
        let min_size: usize = children.iter().map(|p| p.min_size()).sum();
        let max_size: usize = children.iter().map(|p| p.max_size(data_len)).sum();
        let n = children.len();
        let mut suffix_min = vec![0usize; n + 1];
        for i in (0..n).rev() {
            suffix_min[i] = suffix_min[i + 1] + children[i].min_size();
        }
        Ok(Some(Prepared::Seq(SeqPrep {
            min_size,
            max_size,
            children,
            suffix_min,
            last_positive: RefCell::new(Vec::new()),
        })))
    }

    pub(crate) fn apply(
        &self,
        data: &S,
        prep: &SeqPrep<S>,
        window: Window,
        captures: &mut CaptureStore,
        subsets: Option<&NamedData<S>>,
        path: &mut Vec<String>,
    ) -> Result<MatchOutcome, MatchError> {
        let n = self.children.len();

        if window.length == 0 {
            // Every child must independently accept a zero-width match at
            // the same offset.
            let mut committed = 0usize;
            for (i, child) in self.children.iter().enumerate() {
                let cprep = &prep.children[i];
                path.push(child_label("concatenation", self.name(), i, child));
                let res = child.apply(data, cprep, Window::new(window.left, 0), captures, subsets, path);
                path.pop();
                match res? {
                    MatchOutcome::ZeroWidth => committed += 1,
                    _ => {
                        for j in (0..committed).rev() {
                            self.children[j].retract(&prep.children[j], captures);
                        }
                        return Ok(MatchOutcome::NoMatch);
                    }
                }
            }
            prep.last_positive
                .replace(vec![MatchRecord::new(window.left, Length::ZeroButTrue); n]);
            return Ok(MatchOutcome::ZeroWidth);
        }

        let mut records: Vec<Option<MatchRecord>> = vec![None; n];

        let outer_right = window.left + window.length - 1;

        // Tries to enter child `index` at `[left, right]`, returning `None`
        // if there isn't even room for `index`'s minimum plus every
        // following child's minimum.
        let try_enter = |index: usize, left: usize, right: usize| -> Option<Frame> {
            let avail = if left > right { 0 } else { right - left + 1 };
            let tail_min = prep.suffix_min[index + 1];
            if avail < tail_min {
                return None;
            }
            let max_consumable = avail - tail_min;
            let min_here = prep.children[index].min_size();
            if max_consumable < min_here {
                return None;
            }
            Some(Frame { index, left, right, size: max_consumable, state: FrameState::TryOwn })
        };

        let mut stack: Vec<Frame> = Vec::new();
        match try_enter(0, window.left, outer_right) {
            Some(frame) => stack.push(frame),
            None => return Ok(MatchOutcome::NoMatch),
        }
        let mut pending: Option<MatchOutcome> = None;

        loop {
            let top = stack.len() - 1;
            let (index, left, size, state) = {
                let f = &stack[top];
                (f.index, f.left, f.size, f.state)
            };
            match state {
                FrameState::TryOwn => {
                    let child = &self.children[index];
                    let cprep = &prep.children[index];
                    path.push(child_label("concatenation", self.name(), index, child));
                    let res = child.apply(data, cprep, Window::new(left, size), captures, subsets, path);
                    path.pop();
                    match res? {
                        MatchOutcome::NoMatch => {
                            stack.pop();
                            if stack.is_empty() {
                                return Ok(MatchOutcome::NoMatch);
                            }
                            pending = Some(MatchOutcome::NoMatch);
                        }
                        MatchOutcome::Backoff(d) => {
                            let new_size = size.saturating_sub(d);
                            if new_size < prep.children[index].min_size() {
                                stack.pop();
                                if stack.is_empty() {
                                    return Ok(MatchOutcome::NoMatch);
                                }
                                pending = Some(MatchOutcome::NoMatch);
                            } else {
                                stack[top].size = new_size;
                            }
                        }
                        outcome @ (MatchOutcome::Consumed(_) | MatchOutcome::ZeroWidth) => {
                            let c = match outcome {
                                MatchOutcome::Consumed(c) => c,
                                _ => 0,
                            };
                            stack[top].size = c;
                            records[index] = Some(MatchRecord::new(
                                left,
                                if c == 0 { Length::ZeroButTrue } else { Length::Count(c) },
                            ));
                            if index == n - 1 {
                                let result =
                                    if c == 0 { MatchOutcome::ZeroWidth } else { MatchOutcome::Consumed(c) };
                                stack.pop();
                                if stack.is_empty() {
                                    prep.last_positive.replace(
                                        records.into_iter().map(|r| r.expect("every child matched")).collect(),
                                    );
                                    return Ok(result);
                                }
                                pending = Some(result);
                            } else {
                                let right = stack[top].right;
                                stack[top].state = FrameState::AwaitTail;
                                match try_enter(index + 1, left + c, right) {
                                    Some(frame) => stack.push(frame),
                                    None => pending = Some(MatchOutcome::NoMatch),
                                }
                            }
                        }
                    }
                }
                FrameState::AwaitTail => {
                    let outcome = pending.take().expect("AwaitTail always follows a pending result");
                    match outcome {
                        MatchOutcome::Consumed(tail_c) => {
                            let total = size + tail_c;
                            stack.pop();
                            let result = MatchOutcome::Consumed(total);
                            if stack.is_empty() {
                                prep.last_positive.replace(
                                    records.into_iter().map(|r| r.expect("every child matched")).collect(),
                                );
                                return Ok(result);
                            }
                            pending = Some(result);
                        }
                        MatchOutcome::ZeroWidth => {
                            stack.pop();
                            let result = if size == 0 { MatchOutcome::ZeroWidth } else { MatchOutcome::Consumed(size) };
                            if stack.is_empty() {
                                prep.last_positive.replace(
                                    records.into_iter().map(|r| r.expect("every child matched")).collect(),
                                );
                                return Ok(result);
                            }
                            pending = Some(result);
                        }
                        MatchOutcome::Backoff(d) => {
                            let new_right = stack[top].right.saturating_sub(d);
                            stack[top].right = new_right;
                            match try_enter(index + 1, left + size, new_right) {
                                Some(frame) => stack.push(frame),
                                None => pending = Some(MatchOutcome::NoMatch),
                            }
                        }
                        MatchOutcome::NoMatch => {
                            self.children[index].retract(&prep.children[index], captures);
                            match size.checked_sub(1) {
                                Some(new_size) if new_size >= prep.children[index].min_size() => {
                                    stack[top].size = new_size;
                                    stack[top].state = FrameState::TryOwn;
                                }
                                _ => {
                                    stack.pop();
                                    if stack.is_empty() {
                                        return Ok(MatchOutcome::NoMatch);
                                    }
                                    pending = Some(MatchOutcome::NoMatch);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    pub(crate) fn retract(&self, prep: &SeqPrep<S>, captures: &mut CaptureStore) {
        for (child, cprep) in self.children.iter().zip(prep.children.iter()).rev() {
            child.retract(cprep, captures);
        }
        prep.last_positive.replace(Vec::new());
    }

    pub(crate) fn positive_matches(&self, prep: &SeqPrep<S>) -> Vec<MatchRecord> {
        prep.last_positive.borrow().clone()
    }
}

#[derive(Clone, Copy)]
enum FrameState {
    /// About to apply (or retry) this frame's own child at `size`.
    TryOwn,
    /// This frame's own child already succeeded at `size`; waiting on the
    /// result of recursing into the remaining children.
    AwaitTail,
}

struct Frame {
    index: usize,
    left: usize,
    right: usize,
    size: usize,
    state: FrameState,
}

/// Prep state for [`Concatenation`].
pub struct SeqPrep<S: Sequence> {
    pub(crate) min_size: usize,
    pub(crate) max_size: usize,
    children: Vec<Prepared<S>>,
    /// `suffix_min[i]` is the sum of `min_size` over `children[i..]`, used
    /// to compute how much room a given child is allowed to greedily claim
    /// without starving the rest of the chain. `suffix_min[n] == 0`.
    suffix_min: Vec<usize>,
    last_positive: RefCell<Vec<MatchRecord>>,
}
