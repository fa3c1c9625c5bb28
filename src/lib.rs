/*!
A greedy pattern-matching engine for sequences of arbitrary element type —
a regex-style combinator tree that walks any [`Sequence`] rather than a
byte string.

A pattern is built up from atoms ([`atom::Any`], [`atom::Callback`],
[`atom::PositionAssertion`], [`atom::SubroutineAssertion`]) and
combinators ([`group::or::Alternation`], [`group::and::Conjunction`],
[`group::seq::Concatenation`], [`group::repeat::Repetition`]), wrapped in
a [`Pattern`] tree, and driven against a container with [`run_match`]:

```
use seqmatch::{atom, run_match, Pattern};
use seqmatch::quant::QuantSpec;

let pattern: Pattern<Vec<i32>> = Pattern::Any(atom::Any::new(atom::AnyConfig {
    name: Some("any5".to_string()),
    quant: QuantSpec::exact(5),
}));
let data: Vec<i32> = (0..10).collect();
let result = run_match(&pattern, &data).unwrap().unwrap();
assert_eq!(result.left, 0);
assert_eq!(result.len(), 5);
```
*/

pub mod atom;
pub mod capture;
mod engine;
pub mod error;
mod group;
mod outcome;
pub mod pattern;
pub mod position;
pub mod quant;
pub mod sequence;

pub use capture::{CaptureStore, Length, MatchRecord, Window};
pub use engine::{run_match, run_match_named, MatchResult};
pub use error::{BuildError, BuildErrorKind, MatchError, MatchErrorKind};
pub use group::and::Conjunction;
pub use group::or::Alternation;
pub use group::repeat::{RepeatBound, RepeatEndpoint, RepeatSpec, Repetition};
pub use group::seq::Concatenation;
pub use outcome::MatchOutcome;
pub use pattern::Pattern;
pub use sequence::{KeyedLength, NamedData, Sequence};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Any, AnyConfig};
    use crate::quant::QuantSpec;

    #[test]
    fn any_matches_its_quantifier() {
        let pattern: Pattern<Vec<i32>> =
            Pattern::Any(Any::new(AnyConfig { name: None, quant: QuantSpec::exact(5) }));
        let data: Vec<i32> = (0..10).collect();
        let result = run_match(&pattern, &data).unwrap().unwrap();
        assert_eq!(result.left, 0);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn no_match_returns_none() {
        let pattern: Pattern<Vec<i32>> =
            Pattern::Any(Any::new(AnyConfig { name: None, quant: QuantSpec::exact(50) }));
        let data: Vec<i32> = (0..10).collect();
        assert!(run_match(&pattern, &data).unwrap().is_none());
    }
}
