/*!
Repetition (§4.7): applies one sub-pattern as many times in a row as it
greedily can, subject to a `(min_rep, max_rep)` repeat count. Each
iteration reuses the same prep (prep is a function of the container, not
of where in it we currently are), so no re-preparation happens per
iteration.
*/

use std::cell::{Cell, RefCell};

use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::{BuildError, MatchError};
use crate::outcome::MatchOutcome;
use crate::pattern::{Pattern, Prepared};
use crate::sequence::{NamedData, Sequence};

use super::child_label;

/// The upper bound of a repeat count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatBound {
    Bounded(usize),
    Unbounded,
}

/// One endpoint of an explicit `(min, max)` repeat-count tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatEndpoint {
    Finite(usize),
    Infinite,
}

/// The repeat-spec mini-grammar of §4.7: how a caller spells out how many
/// times the sub-pattern may repeat.
#[derive(Clone, Debug)]
pub enum RepeatSpec {
    /// `undef` — the same as `*`.
    Default,
    /// `*`: zero or more.
    Star,
    /// `+`: one or more.
    Plus,
    /// A bare non-negative integer: exactly that many times.
    Exact(usize),
    /// The `"a,b"` string form; either side may be blank (`""` means `0` on
    /// the left, unbounded on the right).
    CommaForm(String),
    /// The explicit tuple form.
    Bounds(RepeatEndpoint, RepeatEndpoint),
}

impl RepeatSpec {
    pub(crate) fn resolve(&self) -> Result<(usize, RepeatBound), BuildError> {
        match self {
            RepeatSpec::Default | RepeatSpec::Star => Ok((0, RepeatBound::Unbounded)),
            RepeatSpec::Plus => Ok((1, RepeatBound::Unbounded)),
            RepeatSpec::Exact(n) => Ok((*n, RepeatBound::Bounded(*n))),
            RepeatSpec::CommaForm(s) => parse_comma_form(s),
            RepeatSpec::Bounds(lo, hi) => {
                let min = match lo {
                    RepeatEndpoint::Finite(n) => *n,
                    RepeatEndpoint::Infinite => {
                        return Err(BuildError::validation("repeat minimum cannot be infinite"))
                    }
                };
                let max = match hi {
                    RepeatEndpoint::Finite(n) => RepeatBound::Bounded(*n),
                    RepeatEndpoint::Infinite => RepeatBound::Unbounded,
                };
                if let RepeatBound::Bounded(m) = max {
                    if m < min {
                        return Err(BuildError::validation("repeat maximum is less than repeat minimum"));
                    }
                }
                Ok((min, max))
            }
        }
    }
}

fn parse_comma_form(s: &str) -> Result<(usize, RepeatBound), BuildError> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| BuildError::syntax(s, "expected a comma-separated \"min,max\" repeat count"))?;
    let lo = lo.trim();
    let hi = hi.trim();
    let min = if lo.is_empty() {
        0
    } else {
        lo.parse::<usize>()
            .map_err(|_| BuildError::validation(format!("invalid repeat minimum {:?}", lo)))?
    };
    let max = if hi.is_empty() {
        RepeatBound::Unbounded
    } else {
        RepeatBound::Bounded(
            hi.parse::<usize>()
                .map_err(|_| BuildError::validation(format!("invalid repeat maximum {:?}", hi)))?,
        )
    };
    if let RepeatBound::Bounded(m) = max {
        if m < min {
            return Err(BuildError::validation("repeat maximum is less than repeat minimum"));
        }
    }
    Ok((min, max))
}

/// Applies `child` between `min_rep` and `max_rep` times, back to back,
/// greedily.
pub struct Repetition<S: Sequence> {
    name: Option<String>,
    child: Pattern<S>,
    min_rep: usize,
    max_rep: RepeatBound,
}

impl<S: Sequence> Repetition<S> {
    pub fn new(name: Option<String>, child: Pattern<S>, spec: RepeatSpec) -> Result<Repetition<S>, BuildError> {
        let (min_rep, max_rep) = spec.resolve()?;
        Ok(Repetition { name, child, min_rep, max_rep })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn child(&self) -> &Pattern<S> {
        &self.child
    }

    pub(crate) fn prep(&self, data: &S) -> Result<Option<Prepared<S>>, MatchError> {
        let template = match self.child.prep(data)? {
            Some(p) => p,
            None => return Ok(None),
        };
        let data_len = data.seq_len();
        let child_min = template.min_size();
        let child_max = template.max_size(data_len);
        let min_size = child_min.saturating_mul(self.min_rep);
        Ok(Some(Prepared::Repeat(Box::new(RepeatPrep {
            min_size,
            child_max_size: child_max,
            min_rep: self.min_rep,
            max_rep: self.max_rep,
            template,
            last_iterations: Cell::new(0),
            last_positive: RefCell::new(Vec::new()),
        }))))
    }

    pub(crate) fn apply(
        &self,
        data: &S,
        prep: &RepeatPrep<S>,
        window: Window,
        captures: &mut CaptureStore,
        subsets: Option<&NamedData<S>>,
        path: &mut Vec<String>,
    ) -> Result<MatchOutcome, MatchError> {
        let mut cursor = window.left;
        let mut remaining = window.length;
        let mut total = 0usize;
        let mut iterations = 0usize;
        let mut records: Vec<MatchRecord> = Vec::new();
        let max_iterations = match prep.max_rep {
            RepeatBound::Bounded(m) => m,
            RepeatBound::Unbounded => usize::MAX,
        };
        let child_min = prep.template.min_size();
        let child_max = prep.template.max_size(data.seq_len());

        'outer: while iterations < max_iterations {
            if child_min > remaining {
                break;
            }
            let mut size = remaining.min(child_max);
            loop {
                if size < child_min {
                    break 'outer;
                }
                let child_window = Window::new(cursor, size);
                path.push(child_label("repetition", self.name(), iterations, &self.child));
                let res = self.child.apply(data, &prep.template, child_window, captures, subsets, path);
                path.pop();
                match res? {
                    MatchOutcome::Backoff(d) => {
                        size = size.saturating_sub(d);
                        continue;
                    }
                    MatchOutcome::NoMatch => break 'outer,
                    MatchOutcome::Consumed(c) => {
                        records.push(MatchRecord::new(cursor, Length::Count(c)));
                        cursor += c;
                        remaining -= c;
                        total += c;
                        iterations += 1;
                        break;
                    }
                    MatchOutcome::ZeroWidth => {
                        // A non-consuming iteration can repeat forever
                        // under an unbounded max; one such iteration is
                        // accepted and the loop then stops, mirroring the
                        // "hard zero stops the loop, it doesn't fail it"
                        // rule generalized to "no further progress is
                        // possible here either".
                        records.push(MatchRecord::new(cursor, Length::ZeroButTrue));
                        iterations += 1;
                        break 'outer;
                    }
                }
            }
        }

        prep.last_iterations.set(iterations);
        if iterations < prep.min_rep {
            for _ in 0..iterations {
                self.child.retract(&prep.template, captures);
            }
            prep.last_iterations.set(0);
            prep.last_positive.replace(Vec::new());
            return Ok(MatchOutcome::NoMatch);
        }
        prep.last_positive.replace(records);
        Ok(if total == 0 { MatchOutcome::ZeroWidth } else { MatchOutcome::Consumed(total) })
    }

    pub(crate) fn retract(&self, prep: &RepeatPrep<S>, captures: &mut CaptureStore) {
        for _ in 0..prep.last_iterations.take() {
            self.child.retract(&prep.template, captures);
        }
        prep.last_positive.replace(Vec::new());
    }

    pub(crate) fn positive_matches(&self, prep: &RepeatPrep<S>) -> Vec<MatchRecord> {
        prep.last_positive.borrow().clone()
    }
}

/// Prep state for [`Repetition`]. The same prepared child (`template`) is
/// reused for every iteration.
pub struct RepeatPrep<S: Sequence> {
    pub(crate) min_size: usize,
    child_max_size: usize,
    min_rep: usize,
    max_rep: RepeatBound,
    template: Prepared<S>,
    /// Iteration count of the most recent successful `apply`, so an
    /// ancestor's `retract` can undo exactly that many nested pushes.
    last_iterations: Cell<usize>,
    last_positive: RefCell<Vec<MatchRecord>>,
}

impl<S: Sequence> RepeatPrep<S> {
    pub(crate) fn max_size(&self, data_len: usize) -> usize {
        match self.max_rep {
            RepeatBound::Bounded(m) => self.child_max_size.saturating_mul(m),
            RepeatBound::Unbounded => {
                if self.child_max_size == 0 {
                    0
                } else {
                    data_len
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_form_blank_sides() {
        assert_eq!(parse_comma_form("2,").unwrap(), (2, RepeatBound::Unbounded));
        assert_eq!(parse_comma_form(",5").unwrap(), (0, RepeatBound::Bounded(5)));
        assert_eq!(parse_comma_form("2,5").unwrap(), (2, RepeatBound::Bounded(5)));
    }

    #[test]
    fn comma_form_rejects_max_below_min() {
        assert!(parse_comma_form("5,2").is_err());
    }

    #[test]
    fn comma_form_rejects_non_numeric() {
        assert!(parse_comma_form("a,b").is_err());
    }

    #[test]
    fn default_and_sugar_forms_resolve() {
        assert_eq!(RepeatSpec::Default.resolve().unwrap(), (0, RepeatBound::Unbounded));
        assert_eq!(RepeatSpec::Star.resolve().unwrap(), (0, RepeatBound::Unbounded));
        assert_eq!(RepeatSpec::Plus.resolve().unwrap(), (1, RepeatBound::Unbounded));
        assert_eq!(RepeatSpec::Exact(3).resolve().unwrap(), (3, RepeatBound::Bounded(3)));
    }
}
