/*!
The constant-success atom: matches any window within its quantifier
bounds, unconditionally. This is the "match anything" leaf used to pad out
a sequence pattern (e.g. "then skip at least 2 elements").
*/

use crate::capture::Window;
use crate::outcome::MatchOutcome;
use crate::quant::{self, QuantSpec};

/// Configuration for [`Any`].
#[derive(Clone, Debug)]
pub struct AnyConfig {
    pub name: Option<String>,
    pub quant: QuantSpec,
}

impl Default for AnyConfig {
    fn default() -> AnyConfig {
        AnyConfig { name: None, quant: QuantSpec::default_bound() }
    }
}

/// Matches any `[min_quant, max_quant]`-bounded window, always succeeding.
#[derive(Clone, Debug)]
pub struct Any {
    pub(crate) config: AnyConfig,
}

impl Any {
    pub fn new(config: AnyConfig) -> Any {
        Any { config }
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub(crate) fn prep(&self, data_len: usize) -> (usize, usize) {
        self.config.quant.resolve(data_len)
    }

    pub(crate) fn apply(&self, window: Window, min_size: usize, max_size: usize) -> MatchOutcome {
        quant::greedy_within(window.length, min_size, max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_up_to_its_max() {
        let any = Any::new(AnyConfig { name: None, quant: QuantSpec::exact(5) });
        let (min, max) = any.prep(10);
        assert_eq!(any.apply(Window::new(0, 10), min, max), MatchOutcome::Consumed(5));
    }

    #[test]
    fn fails_when_window_too_small() {
        let any = Any::new(AnyConfig { name: None, quant: QuantSpec::exact(5) });
        let (min, max) = any.prep(10);
        assert_eq!(any.apply(Window::new(0, 3), min, max), MatchOutcome::NoMatch);
    }
}
