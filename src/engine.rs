/*!
The top-level `match` entry point of §4.2: wires a [`crate::pattern::
Pattern`] tree together with a concrete [`Sequence`] and walks every
candidate `left` offset looking for the first accepted match.
*/

use std::collections::HashMap;

use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::MatchError;
use crate::outcome::MatchOutcome;
use crate::pattern::Pattern;
use crate::sequence::{NamedData, Sequence};

/// The outcome of a top-level [`run_match`] call.
#[derive(Clone, Debug)]
pub struct MatchResult {
    pub left: usize,
    pub right: Option<usize>,
    pub length: Length,
    pub captures: HashMap<String, Vec<MatchRecord>>,
    /// The direct children that contributed to the root node's match (§3's
    /// `positive_matches`): one entry per alternative taken, conjunct, or
    /// repetition iteration, depending on the root node's own kind.
    pub positive_matches: Vec<MatchRecord>,
}

impl MatchResult {
    /// The number of elements the top-level match actually consumed.
    pub fn len(&self) -> usize {
        self.length.as_usize()
    }
}

/// Runs `pattern` against `data`, returning the first accepted match (by
/// increasing `left`), or `None` if nothing matches anywhere.
///
/// This is §4.2 steps 1–6, generalized over [`Sequence`] in place of a
/// runtime type-keyed length registry (§9).
pub fn run_match<S: Sequence>(pattern: &Pattern<S>, data: &S) -> Result<Option<MatchResult>, MatchError> {
    run_match_impl(pattern, data, None)
}

/// Runs `pattern` against `named`'s bundle of containers, the `subset_name`-
/// keyed multi-data form of §6: `pattern.match(name1 => data1, name2 =>
/// data2, …)`. The match's own length and offsets come from `named`'s
/// `primary` container; any atom carrying a `subset_name` reads from the
/// correspondingly named container instead, at the same offsets.
pub fn run_match_named<S: Sequence>(
    pattern: &Pattern<S>,
    named: &NamedData<S>,
) -> Result<Option<MatchResult>, MatchError> {
    run_match_impl(pattern, named.primary(), Some(named))
}

fn run_match_impl<S: Sequence>(
    pattern: &Pattern<S>,
    data: &S,
    subsets: Option<&NamedData<S>>,
) -> Result<Option<MatchResult>, MatchError> {
    let data_length = data.seq_len();

    let prepared = match pattern.prep(data)? {
        Some(p) => p,
        None => return Ok(None),
    };

    let min_size = prepared.min_size();
    let max_size = prepared.max_size(data_length).min(data_length);
    if min_size > data_length || max_size < min_size {
        return Ok(None);
    }

    // §4.2 step 5: `left` ranges over `0..=data_length - min_size`. When
    // `min_size == 0` this already extends all the way to `data_length`
    // itself (one past the last element), which is exactly the zero-width
    // extension the spec calls out as a special case.
    let last_left = data_length.saturating_sub(min_size);

    let mut left = 0usize;
    loop {
        if left > last_left {
            return Ok(None);
        }

        // §4.2 step 5: `right = min(left + max_size - 1, data_length - 1)`,
        // i.e. `length = min(max_size, data_length - left)`.
        let length = max_size.min(data_length - left);

        let mut captures = CaptureStore::new();
        let mut path = vec![pattern.label()];
        let outcome =
            pattern.apply(data, &prepared, Window::new(left, length), &mut captures, subsets, &mut path)?;

        match outcome {
            MatchOutcome::Consumed(k) => {
                let positive_matches = pattern.positive_matches(&prepared);
                return Ok(Some(MatchResult {
                    left,
                    right: Some(left + k - 1),
                    length: Length::Count(k),
                    captures: captures.into_map(),
                    positive_matches,
                }));
            }
            MatchOutcome::ZeroWidth => {
                let positive_matches = pattern.positive_matches(&prepared);
                return Ok(Some(MatchResult {
                    left,
                    right: None,
                    length: Length::ZeroButTrue,
                    captures: captures.into_map(),
                    positive_matches,
                }));
            }
            MatchOutcome::NoMatch | MatchOutcome::Backoff(_) => {
                debug_assert!(captures.is_empty(), "a failed top-level match must leave every capture stack empty");
                left += 1;
            }
        }
    }
}
