/*!
The `apply` return protocol of §4.3, modeled as the closed enum the §9
redesign notes ask for instead of an overloaded integer.
*/

use crate::error::MatchError;

/// What a node's `apply` reports for a single window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Matched `k` elements beginning at the window's `left`, `1 <= k <=
    /// length`. If `k` is less than the window's length, the node is
    /// greedy and has already reported its best answer for this `left` —
    /// the caller must not retry it with a shorter window.
    Consumed(usize),
    /// Matched zero elements at `left` (a zero-width success).
    ZeroWidth,
    /// No match at `left`, and no shorter window at this `left` can match
    /// either. The caller should prune `left` entirely rather than retry
    /// with a smaller `right`.
    NoMatch,
    /// No match at the current length, but a window shorter by at least
    /// `d` might match. The caller retries with `right -= d`.
    Backoff(usize),
}

impl MatchOutcome {
    /// Validates that `self` is a legal response to a window of the given
    /// `length`, per §4.3's "any value > length is a contract violation"
    /// rule. `path` names the offending node for diagnostics.
    pub(crate) fn validate(self, length: usize, path: &[String]) -> Result<MatchOutcome, MatchError> {
        match self {
            MatchOutcome::Consumed(k) if k == 0 || k > length => Err(MatchError::contract_violation(
                path.to_vec(),
                format!("apply returned Consumed({}) for a window of length {}", k, length),
            )),
            MatchOutcome::Backoff(d) if d == 0 => Err(MatchError::contract_violation(
                path.to_vec(),
                "apply returned Backoff(0), which is not a legal backoff hint".to_string(),
            )),
            other => Ok(other),
        }
    }
}
