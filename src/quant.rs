/*!
The `Quantified` mixin shared by every atom whose match length is bounded
by `[min_quant, max_quant]` rather than fixed at `0` (zero-width
assertions never use this; they are always `[0, 0]`).

Bounds are position expressions (§4.1), so they may depend on the
container length being matched against (`"50%"`) and are re-resolved on
every `prep`. Syntax is validated eagerly at construction time — the
grammar itself does not need a length to tell a malformed expression from
a well-formed one — while the numeric value is only known once `prep` sees
real data.
*/

use crate::error::BuildError;
use crate::position;

/// A `[min_quant, max_quant]` pair of position expressions bounding how
/// much of a window a quantified atom may consume.
#[derive(Clone, Debug)]
pub struct QuantSpec {
    min_expr: String,
    max_expr: String,
}

impl QuantSpec {
    /// The default bound used when an atom doesn't specify one: consume at
    /// least one element, up to the entire window offered to it.
    pub fn default_bound() -> QuantSpec {
        QuantSpec::new("1", "100%").expect("default quantifier is always well-formed")
    }

    /// A quantifier fixed at exactly `n`.
    pub fn exact(n: usize) -> QuantSpec {
        let s = n.to_string();
        QuantSpec::new(s.clone(), s).expect("integer literal is always well-formed")
    }

    /// Constructs a quantifier from two position expressions, validating
    /// their syntax immediately.
    pub fn new(min_expr: impl Into<String>, max_expr: impl Into<String>) -> Result<QuantSpec, BuildError> {
        let min_expr = min_expr.into();
        let max_expr = max_expr.into();
        // Syntax validity does not depend on the container length; 0 is
        // used purely as a placeholder to drive the parser.
        position::parse_position(0, &min_expr)?;
        position::parse_position(0, &max_expr)?;
        Ok(QuantSpec { min_expr, max_expr })
    }

    /// Resolves `[min_quant, max_quant]` against a concrete container
    /// length, clamping both ends to `[0, len]` and swapping them if the
    /// expressions evaluated out of order.
    pub fn resolve(&self, len: usize) -> (usize, usize) {
        let min = position::parse_position_clamped(len, &self.min_expr)
            .expect("syntax already validated at construction");
        let max = position::parse_position_clamped(len, &self.max_expr)
            .expect("syntax already validated at construction");
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }
}

/// The shared greedy-consumption rule used by every quantified atom: take
/// as much of the offered window as `max_size` allows, failing outright if
/// even `min_size` doesn't fit.
pub(crate) fn greedy_within(
    window_len: usize,
    min_size: usize,
    max_size: usize,
) -> crate::outcome::MatchOutcome {
    use crate::outcome::MatchOutcome;
    if window_len < min_size {
        return MatchOutcome::NoMatch;
    }
    let k = window_len.min(max_size);
    if k == 0 {
        MatchOutcome::ZeroWidth
    } else {
        MatchOutcome::Consumed(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_full_window() {
        let (min, max) = QuantSpec::default_bound().resolve(10);
        assert_eq!((min, max), (1, 10));
    }

    #[test]
    fn exact_pins_both_ends() {
        let (min, max) = QuantSpec::exact(6).resolve(100);
        assert_eq!((min, max), (6, 6));
    }

    #[test]
    fn rejects_malformed_expression_at_construction() {
        assert!(QuantSpec::new("[5", "10").is_err());
    }

    #[test]
    fn percent_bounds_resolve_against_len() {
        let q = QuantSpec::new("0", "50%").unwrap();
        assert_eq!(q.resolve(20), (0, 10));
    }
}
