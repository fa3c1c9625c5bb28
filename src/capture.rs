/*!
The transient, per-application state threaded through a match (§3's
"match info"), and the per-name capture stacks it feeds (§4.9).
*/

use std::collections::HashMap;

/// The length of a successful match: either a concrete element count, or
/// the "0 but true" sentinel of a zero-width success.
///
/// §4.3 and the §9 redesign notes both call for this to be an explicit
/// value rather than an overloaded integer, since ordinary `0` means
/// "hard failure" everywhere in this engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    /// Matched this many elements.
    Count(usize),
    /// Matched zero elements, but the match itself succeeded.
    ZeroButTrue,
}

impl Length {
    /// The number of elements actually consumed (`0` for both hard and
    /// zero-width "matches" — callers that need to distinguish the two
    /// should match on the variant directly).
    pub fn as_usize(self) -> usize {
        match self {
            Length::Count(n) => n,
            Length::ZeroButTrue => 0,
        }
    }
}

/// A search window: the contiguous range `[left, left + length)` a node is
/// currently being asked to match against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub left: usize,
    pub length: usize,
}

impl Window {
    pub fn new(left: usize, length: usize) -> Window {
        Window { left, length }
    }

    /// The inclusive right edge of this window, or `None` if it is empty.
    pub fn right(&self) -> Option<usize> {
        if self.length == 0 {
            None
        } else {
            Some(self.left + self.length - 1)
        }
    }

    /// A copy of this window with its right edge pulled in by `d`
    /// elements (saturating at an empty window), used to implement
    /// backoff retries.
    pub fn shrink_right_by(&self, d: usize) -> Window {
        Window { left: self.left, length: self.length.saturating_sub(d) }
    }

    /// A copy of this window truncated to `max_len` elements.
    pub fn capped_at(&self, max_len: usize) -> Window {
        Window { left: self.left, length: self.length.min(max_len) }
    }
}

/// Per-atom metadata attached to a successful match (e.g. a fitted line's
/// slope and intercept). Kept as a plain numeric map rather than an open
/// type parameter: every atom in this crate that wants to report auxiliary
/// numbers can do so without the engine needing to know its shape.
pub type Metadata = HashMap<String, f64>;

/// One accepted contribution of a named sub-pattern, recorded in the
/// top-level capture map.
#[derive(Clone, Debug, Default)]
pub struct MatchRecord {
    pub left: usize,
    pub length: Length,
    pub metadata: Metadata,
}

impl MatchRecord {
    pub fn new(left: usize, length: Length) -> MatchRecord {
        MatchRecord { left, length, metadata: Metadata::new() }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> MatchRecord {
        self.metadata = metadata;
        self
    }

    /// The inclusive right edge of this match, or `None` for a zero-width
    /// match.
    pub fn right(&self) -> Option<usize> {
        let n = self.length.as_usize();
        if n == 0 {
            None
        } else {
            Some(self.left + n - 1)
        }
    }
}

/// The append-only, per-name stack of accepted matches (§4.9).
///
/// Every successful named node pushes its record; backtracking (a
/// conjunction shrinking its window, a concatenation failing its tail, an
/// alternation trying the next child) pops the most recent entry for that
/// name. The memory-leak invariant of §4.9/§8 is that after a failed
/// top-level match, every name's stack is back to empty.
#[derive(Clone, Debug, Default)]
pub struct CaptureStore {
    by_name: HashMap<String, Vec<MatchRecord>>,
}

impl CaptureStore {
    pub fn new() -> CaptureStore {
        CaptureStore::default()
    }

    pub fn push(&mut self, name: &str, record: MatchRecord) {
        self.by_name.entry(name.to_string()).or_default().push(record);
    }

    /// Pops the most recent entry for `name`. A no-op (other than being a
    /// logic error in the caller) if the stack is already empty.
    pub fn pop(&mut self, name: &str) {
        if let Some(stack) = self.by_name.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.by_name.remove(name);
            }
        }
    }

    /// True iff every name's stack is empty — the state a fresh or a
    /// fully-backtracked-out `CaptureStore` must be in.
    pub fn is_empty(&self) -> bool {
        self.by_name.values().all(|v| v.is_empty())
    }

    pub fn into_map(self) -> HashMap<String, Vec<MatchRecord>> {
        self.by_name
    }
}
