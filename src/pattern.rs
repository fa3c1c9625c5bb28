/*!
The pattern tree itself (§3 "pattern node"): the closed sum type the §9
redesign notes prefer over subclass polymorphism, since the set of node
kinds here is closed and exhaustiveness is checkable by the compiler.

Every node is immutable once constructed; all per-match mutable state
lives in [`crate::capture::Window`]/[`Prepared`], never on the node
itself (§5) — which is exactly what makes a pattern tree safe to re-enter
through a [`crate::atom::SubroutineAssertion`] or window callback that
calls back into `run_match` with the same tree.
*/

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::atom;
use crate::capture::{CaptureStore, Length, MatchRecord, Window};
use crate::error::{BuildError, MatchError};
use crate::group;
use crate::outcome::MatchOutcome;
use crate::sequence::{NamedData, Sequence};

/// A node in a pattern tree.
///
/// Atoms ([`Pattern::Any`], [`Pattern::Callback`], [`Pattern::
/// PositionAssertion`], [`Pattern::SubroutineAssertion`]) are leaves.
/// Groupers ([`Pattern::Or`], [`Pattern::And`], [`Pattern::Seq`],
/// [`Pattern::Repeat`]) own their children exclusively, except
/// [`Pattern::Shared`], which wraps an `Rc` so the same subtree may
/// deliberately appear at more than one position in the same tree (§4.2's
/// "explicit sharing").
pub enum Pattern<S: Sequence> {
    Any(atom::Any),
    Callback(atom::Callback<S>),
    PositionAssertion(atom::PositionAssertion),
    SubroutineAssertion(atom::SubroutineAssertion<S>),
    Or(group::or::Alternation<S>),
    And(group::and::Conjunction<S>),
    Seq(group::seq::Concatenation<S>),
    Repeat(Box<group::repeat::Repetition<S>>),
    Shared(Rc<Pattern<S>>),
}

impl<S: Sequence> Pattern<S> {
    /// This node's capture name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Pattern::Any(a) => a.name(),
            Pattern::Callback(c) => c.name(),
            Pattern::PositionAssertion(a) => a.name(),
            Pattern::SubroutineAssertion(a) => a.name(),
            Pattern::Or(g) => g.name(),
            Pattern::And(g) => g.name(),
            Pattern::Seq(g) => g.name(),
            Pattern::Repeat(g) => g.name(),
            Pattern::Shared(inner) => inner.name(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Pattern::Any(_) => "any",
            Pattern::Callback(_) => "callback",
            Pattern::PositionAssertion(_) => "position assertion",
            Pattern::SubroutineAssertion(_) => "subroutine assertion",
            Pattern::Or(_) => "alternation",
            Pattern::And(_) => "conjunction",
            Pattern::Seq(_) => "concatenation",
            Pattern::Repeat(_) => "repetition",
            Pattern::Shared(inner) => inner.kind(),
        }
    }

    /// A diagnostic label for this node, e.g. `alternation [outer]` or
    /// `any (unnamed)`.
    pub(crate) fn label(&self) -> String {
        match self.name() {
            Some(n) => format!("{} [{}]", self.kind(), n),
            None => format!("{} (unnamed)", self.kind()),
        }
    }

    /// Validates that no two distinct static positions in this tree share
    /// a capture name (§4.2's name registry), treating [`Pattern::Shared`]
    /// occurrences of the very same `Rc` as one position.
    pub(crate) fn validate_names(&self) -> Result<(), BuildError> {
        let mut seen_ptrs = HashSet::new();
        let mut names = HashSet::new();
        self.collect_names(&mut seen_ptrs, &mut names)
    }

    fn collect_names(
        &self,
        seen_ptrs: &mut HashSet<*const Pattern<S>>,
        names: &mut HashSet<String>,
    ) -> Result<(), BuildError> {
        if let Pattern::Shared(rc) = self {
            let ptr = Rc::as_ptr(rc);
            if seen_ptrs.contains(&ptr) {
                return Ok(());
            }
            seen_ptrs.insert(ptr);
        }
        if let Some(name) = self.name() {
            if !names.insert(name.to_string()) {
                return Err(BuildError::duplicate_name(name));
            }
        }
        match self {
            Pattern::Or(g) => g.children().iter().try_for_each(|c| c.collect_names(seen_ptrs, names)),
            Pattern::And(g) => g.children().iter().try_for_each(|c| c.collect_names(seen_ptrs, names)),
            Pattern::Seq(g) => g.children().iter().try_for_each(|c| c.collect_names(seen_ptrs, names)),
            Pattern::Repeat(g) => g.child().collect_names(seen_ptrs, names),
            Pattern::Shared(rc) => rc.collect_names(seen_ptrs, names),
            _ => Ok(()),
        }
    }

    /// Data-dependent preparation (§4.2 step 3 generalized to every node,
    /// §5's ordering guarantee that children prep before their parent's
    /// `apply`). Returns `Ok(None)` if this node cannot possibly match
    /// against `data` (a soft prep failure, §7 item 2), never an error.
    pub(crate) fn prep(&self, data: &S) -> Result<Option<Prepared<S>>, MatchError> {
        let data_len = data.seq_len();
        match self {
            Pattern::Any(a) => {
                let (min, max) = a.prep(data_len);
                Ok(Some(Prepared::Sized { min_size: min, max_size: max }))
            }
            Pattern::Callback(c) => {
                let (min, max) = c.prep(data_len);
                Ok(Some(Prepared::Callback {
                    min_size: min,
                    max_size: max,
                    memo: RefCell::new(HashMap::new()),
                }))
            }
            Pattern::PositionAssertion(_) | Pattern::SubroutineAssertion(_) => {
                Ok(Some(Prepared::ZeroWidth))
            }
            Pattern::Or(g) => g.prep(data),
            Pattern::And(g) => g.prep(data),
            Pattern::Seq(g) => g.prep(data),
            Pattern::Repeat(g) => g.prep(data),
            Pattern::Shared(inner) => Ok(inner.prep(data)?.map(|p| Prepared::Shared(Box::new(p)))),
        }
    }

    /// Tests this node against `window`, threading `captures` through so
    /// named children can push/pop their contributions, and `path` so a
    /// contract violation or callback failure can be attributed precisely.
    pub(crate) fn apply(
        &self,
        data: &S,
        prepared: &Prepared<S>,
        window: Window,
        captures: &mut CaptureStore,
        subsets: Option<&NamedData<S>>,
        path: &mut Vec<String>,
    ) -> Result<MatchOutcome, MatchError> {
        let outcome = match (self, prepared) {
            (Pattern::Any(a), Prepared::Sized { min_size, max_size }) => {
                Ok(a.apply(window, *min_size, *max_size))
            }
            (Pattern::Callback(c), Prepared::Callback { min_size, max_size, memo }) => {
                c.apply(data, window, *min_size, *max_size, memo, subsets, path)
            }
            (Pattern::PositionAssertion(a), Prepared::ZeroWidth) => {
                a.apply(data.seq_len(), window.left)
            }
            (Pattern::SubroutineAssertion(a), Prepared::ZeroWidth) => {
                a.apply(data, window.left, subsets, path)
            }
            (Pattern::Or(g), Prepared::Or(p)) => g.apply(data, p, window, captures, subsets, path),
            (Pattern::And(g), Prepared::And(p)) => g.apply(data, p, window, captures, subsets, path),
            (Pattern::Seq(g), Prepared::Seq(p)) => g.apply(data, p, window, captures, subsets, path),
            (Pattern::Repeat(g), Prepared::Repeat(p)) => g.apply(data, p, window, captures, subsets, path),
            (Pattern::Shared(inner), Prepared::Shared(p)) => {
                inner.apply(data, p, window, captures, subsets, path)
            }
            _ => unreachable!("a node's Prepared always mirrors its own shape"),
        }?;
        let outcome = outcome.validate(window.length, path)?;
        if let Some(name) = self.name() {
            let length = match outcome {
                MatchOutcome::Consumed(k) => Some(Length::Count(k)),
                MatchOutcome::ZeroWidth => Some(Length::ZeroButTrue),
                _ => None,
            };
            if let Some(length) = length {
                captures.push(name, MatchRecord::new(window.left, length));
            }
        }
        Ok(outcome)
    }

    /// Undoes the capture-store effect of the most recent successful
    /// `apply` of this node (§4.9's pop-on-backtrack half of the capture
    /// discipline). Must be called with the very same `prepared` value that
    /// was passed to that `apply`.
    pub(crate) fn retract(&self, prepared: &Prepared<S>, captures: &mut CaptureStore) {
        if let Some(name) = self.name() {
            captures.pop(name);
        }
        match (self, prepared) {
            (Pattern::Or(g), Prepared::Or(p)) => g.retract(p, captures),
            (Pattern::And(g), Prepared::And(p)) => g.retract(p, captures),
            (Pattern::Seq(g), Prepared::Seq(p)) => g.retract(p, captures),
            (Pattern::Repeat(g), Prepared::Repeat(p)) => g.retract(p, captures),
            (Pattern::Shared(inner), Prepared::Shared(p)) => inner.retract(p, captures),
            _ => {}
        }
    }

    /// The `positive_matches` of §3/§8: the ordered list of direct
    /// children that contributed to this node's most recent successful
    /// `apply` (one entry for alternation, all children in order for
    /// conjunction/concatenation, one per iteration for repetition; always
    /// empty for atoms, which have no children).
    pub(crate) fn positive_matches(&self, prepared: &Prepared<S>) -> Vec<MatchRecord> {
        match (self, prepared) {
            (Pattern::Or(g), Prepared::Or(p)) => g.positive_matches(p),
            (Pattern::And(g), Prepared::And(p)) => g.positive_matches(p),
            (Pattern::Seq(g), Prepared::Seq(p)) => g.positive_matches(p),
            (Pattern::Repeat(g), Prepared::Repeat(p)) => g.positive_matches(p),
            (Pattern::Shared(inner), Prepared::Shared(p)) => inner.positive_matches(p),
            _ => Vec::new(),
        }
    }
}

/// The data-dependent artifacts built by [`Pattern::prep`]: resolved
/// `[min_size, max_size]` bounds plus whatever per-node scratch state
/// (caches, resolved repeat counts, ...) the node needs while being
/// applied. Mirrors the shape of the [`Pattern`] tree it was built from.
pub(crate) enum Prepared<S: Sequence> {
    /// Used by [`Pattern::Any`] and the two zero-width-adjacent atoms.
    Sized { min_size: usize, max_size: usize },
    Callback {
        min_size: usize,
        max_size: usize,
        memo: RefCell<HashMap<(usize, usize), MatchOutcome>>,
    },
    /// Used by both assertion atoms: always `[0, 0]`.
    ZeroWidth,
    Or(group::or::OrPrep<S>),
    And(group::and::AndPrep<S>),
    Seq(group::seq::SeqPrep<S>),
    Repeat(Box<group::repeat::RepeatPrep<S>>),
    Shared(Box<Prepared<S>>),
}

impl<S: Sequence> Prepared<S> {
    pub(crate) fn min_size(&self) -> usize {
        match self {
            Prepared::Sized { min_size, .. } => *min_size,
            Prepared::Callback { min_size, .. } => *min_size,
            Prepared::ZeroWidth => 0,
            Prepared::Or(p) => p.min_size,
            Prepared::And(p) => p.min_size,
            Prepared::Seq(p) => p.min_size,
            Prepared::Repeat(p) => p.min_size,
            Prepared::Shared(p) => p.min_size(),
        }
    }

    pub(crate) fn max_size(&self, data_len: usize) -> usize {
        match self {
            Prepared::Sized { max_size, .. } => *max_size,
            Prepared::Callback { max_size, .. } => *max_size,
            Prepared::ZeroWidth => 0,
            Prepared::Or(p) => p.max_size,
            Prepared::And(p) => p.max_size,
            Prepared::Seq(p) => p.max_size,
            Prepared::Repeat(p) => p.max_size(data_len),
            Prepared::Shared(p) => p.max_size(data_len),
        }
    }
}
