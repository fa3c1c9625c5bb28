/*!
The two zero-width assertion flavors of §4.8: a positional assertion
tested against the current offset alone, and a subroutine assertion that
additionally runs a user callback. Both always have `min_size = max_size =
0`, and a successful match is always reported as [`MatchOutcome::ZeroWidth`]
— never `Consumed`, since consuming anything would itself be a contract
violation for a zero-width node.
*/

use std::rc::Rc;

use crate::error::{BuildError, MatchError};
use crate::outcome::MatchOutcome;
use crate::position;
use crate::sequence::{NamedData, Sequence};

/// Where a [`PositionAssertion`] requires the current offset to fall.
#[derive(Clone, Debug)]
pub enum PositionSpec {
    /// Sugar for `Scalar("0")`.
    Begin,
    /// Sugar for `Scalar("100%")` (i.e. `data_length`).
    End,
    /// The offset must equal this position expression exactly.
    Scalar(String),
    /// The offset must fall within `[lo, hi]` (both resolved and clamped
    /// against the container length, inclusive on both ends).
    Range(String, String),
}

impl PositionSpec {
    fn resolve_matches(&self, data_len: usize, left: usize) -> Result<bool, BuildError> {
        let left = left as isize;
        Ok(match self {
            PositionSpec::Begin => left == 0,
            PositionSpec::End => left == data_len as isize,
            PositionSpec::Scalar(expr) => left == position::parse_position(data_len, expr)?,
            PositionSpec::Range(lo, hi) => {
                let lo = position::parse_position(data_len, lo)?;
                let hi = position::parse_position(data_len, hi)?;
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                left >= lo && left <= hi
            }
        })
    }
}

/// Configuration for [`PositionAssertion`].
#[derive(Clone, Debug)]
pub struct PositionAssertionConfig {
    pub name: Option<String>,
    pub position: PositionSpec,
}

/// Succeeds with a zero-width match iff the current offset satisfies
/// [`PositionSpec`].
#[derive(Clone, Debug)]
pub struct PositionAssertion {
    config: PositionAssertionConfig,
}

impl PositionAssertion {
    pub fn new(config: PositionAssertionConfig) -> PositionAssertion {
        PositionAssertion { config }
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub(crate) fn apply(&self, data_len: usize, left: usize) -> Result<MatchOutcome, MatchError> {
        let holds = self
            .config
            .position
            .resolve_matches(data_len, left)
            .map_err(|e| MatchError::contract_violation(vec![], e.to_string()))?;
        Ok(if holds { MatchOutcome::ZeroWidth } else { MatchOutcome::NoMatch })
    }
}

/// A zero-width callback: `Fn(&S, left) -> Result<bool, String>`, required
/// to report a plain boolean (the source's "numerically zero either way"
/// convention collapses cleanly to this in Rust).
pub type SubroutineFn<S> = Rc<dyn Fn(&S, usize) -> Result<bool, String>>;

/// Configuration for [`SubroutineAssertion`].
#[derive(Clone)]
pub struct SubroutineAssertionConfig<S: Sequence> {
    pub name: Option<String>,
    pub callback: SubroutineFn<S>,
    /// Selects which container this atom reads from under the
    /// `subset_name`-keyed multi-data match entry point of §6. `None` means
    /// "whatever the primary container is".
    pub subset_name: Option<String>,
}

/// Succeeds with a zero-width match iff the user callback returns `true`
/// for the current offset.
#[derive(Clone)]
pub struct SubroutineAssertion<S: Sequence> {
    config: SubroutineAssertionConfig<S>,
}

impl<S: Sequence> SubroutineAssertion<S> {
    pub fn new(config: SubroutineAssertionConfig<S>) -> SubroutineAssertion<S> {
        SubroutineAssertion { config }
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub(crate) fn apply(
        &self,
        data: &S,
        left: usize,
        subsets: Option<&NamedData<S>>,
        path: &[String],
    ) -> Result<MatchOutcome, MatchError> {
        let data = match subsets {
            Some(named) => named.resolve(self.config.subset_name.as_deref()),
            None => data,
        };
        let holds = (self.config.callback)(data, left)
            .map_err(|detail| MatchError::callback(path.to_vec(), detail))?;
        Ok(if holds { MatchOutcome::ZeroWidth } else { MatchOutcome::NoMatch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_matches_only_offset_zero() {
        let a = PositionAssertion::new(PositionAssertionConfig { name: None, position: PositionSpec::Begin });
        assert_eq!(a.apply(10, 0).unwrap(), MatchOutcome::ZeroWidth);
        assert_eq!(a.apply(10, 1).unwrap(), MatchOutcome::NoMatch);
    }

    #[test]
    fn end_matches_data_length() {
        let a = PositionAssertion::new(PositionAssertionConfig { name: None, position: PositionSpec::End });
        assert_eq!(a.apply(10, 10).unwrap(), MatchOutcome::ZeroWidth);
        assert_eq!(a.apply(10, 9).unwrap(), MatchOutcome::NoMatch);
    }

    #[test]
    fn range_is_inclusive_both_ends() {
        let a = PositionAssertion::new(PositionAssertionConfig {
            name: None,
            position: PositionSpec::Range("2".into(), "4".into()),
        });
        for left in 2..=4 {
            assert_eq!(a.apply(10, left).unwrap(), MatchOutcome::ZeroWidth);
        }
        assert_eq!(a.apply(10, 5).unwrap(), MatchOutcome::NoMatch);
    }

    #[test]
    fn subroutine_assertion_delegates_to_callback() {
        let a: SubroutineAssertion<Vec<i32>> = SubroutineAssertion::new(SubroutineAssertionConfig {
            name: None,
            callback: Rc::new(|data, left| Ok(left < data.len() && data[left] == 0)),
            subset_name: None,
        });
        let data = vec![1, 0, 1];
        assert_eq!(a.apply(&data, 1, None, &[]).unwrap(), MatchOutcome::ZeroWidth);
        assert_eq!(a.apply(&data, 0, None, &[]).unwrap(), MatchOutcome::NoMatch);
    }

    #[test]
    fn subroutine_assertion_subset_name_redirects_to_named_container() {
        use crate::sequence::NamedData;

        let a: SubroutineAssertion<Vec<i32>> = SubroutineAssertion::new(SubroutineAssertionConfig {
            name: None,
            callback: Rc::new(|data, left| Ok(left < data.len() && data[left] == 0)),
            subset_name: Some("flags".to_string()),
        });
        let primary = vec![1, 1, 1];
        let flags = vec![1, 0, 1];
        let named = NamedData::new(&primary).insert("flags", &flags);
        assert_eq!(a.apply(&primary, 1, Some(&named), &[]).unwrap(), MatchOutcome::ZeroWidth);
        assert_eq!(a.apply(&primary, 0, Some(&named), &[]).unwrap(), MatchOutcome::NoMatch);
    }
}
