/*!
The two user-callback atom flavors: a single-window callback that decides
how much of an offered span it accepts (it effectively authors its own
`apply`), and a single-element callback tested position-by-position.

Both are [`crate::quant`]-bounded: the engine never offers the callback a
window outside `[min_quant, max_quant]`. A window callback's own verdict
may still legitimately report less than it was offered (it is itself
greedy and already knows its exact extent, per §4.3's edge case), or ask
for backoff, or fail outright.

Because a single-position membership test inside a window callback can be
quadratic to recompute across the overlapping windows that alternation and
concatenation backoff re-probe, every callback atom memoizes its own
`apply` by `(left, right)` for the lifetime of one `prep`.
*/

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::capture::Window;
use crate::error::MatchError;
use crate::outcome::MatchOutcome;
use crate::quant::QuantSpec;
use crate::sequence::{NamedData, Sequence};

/// The result of a user window callback: the same vocabulary `apply`
/// itself uses, since the callback *is* the atom's `apply`.
pub type CallbackResult = Result<MatchOutcome, String>;

/// A callback tested against an entire candidate window at once.
pub type WindowFn<S> = Rc<dyn Fn(&S, Window) -> CallbackResult>;

/// A callback tested against one element at a time.
pub type ElementFn<S> = Rc<dyn Fn(&<S as Sequence>::Item) -> bool>;

/// Configuration for a window-flavored [`Callback`] atom.
#[derive(Clone)]
pub struct WindowCallbackConfig<S: Sequence> {
    pub name: Option<String>,
    pub quant: QuantSpec,
    pub callback: WindowFn<S>,
    /// Selects which container this atom reads from under the
    /// `subset_name`-keyed multi-data match entry point of §6. `None` means
    /// "whatever the primary container is".
    pub subset_name: Option<String>,
}

/// Configuration for an element-flavored [`Callback`] atom.
#[derive(Clone)]
pub struct ElementCallbackConfig<S: Sequence> {
    pub name: Option<String>,
    pub quant: QuantSpec,
    pub predicate: ElementFn<S>,
    /// Selects which container this atom reads from under the
    /// `subset_name`-keyed multi-data match entry point of §6. `None` means
    /// "whatever the primary container is".
    pub subset_name: Option<String>,
}

/// The two callback flavors named in §4.3: a single-window decision, or a
/// per-element predicate applied greedily.
#[derive(Clone)]
pub enum Callback<S: Sequence> {
    Window(WindowCallbackConfig<S>),
    Element(ElementCallbackConfig<S>),
}

impl<S: Sequence> Callback<S> {
    pub fn name(&self) -> Option<&str> {
        match self {
            Callback::Window(c) => c.name.as_deref(),
            Callback::Element(c) => c.name.as_deref(),
        }
    }

    fn quant(&self) -> &QuantSpec {
        match self {
            Callback::Window(c) => &c.quant,
            Callback::Element(c) => &c.quant,
        }
    }

    fn subset_name(&self) -> Option<&str> {
        match self {
            Callback::Window(c) => c.subset_name.as_deref(),
            Callback::Element(c) => c.subset_name.as_deref(),
        }
    }

    pub(crate) fn prep(&self, data_len: usize) -> (usize, usize) {
        self.quant().resolve(data_len)
    }

    /// `path` names this node for diagnostics if the callback misbehaves.
    pub(crate) fn apply(
        &self,
        data: &S,
        window: Window,
        min_size: usize,
        max_size: usize,
        memo: &RefCell<HashMap<(usize, usize), MatchOutcome>>,
        subsets: Option<&NamedData<S>>,
        path: &[String],
    ) -> Result<MatchOutcome, MatchError> {
        let data = match subsets {
            Some(named) => named.resolve(self.subset_name()),
            None => data,
        };
        let bounded = window.capped_at(max_size);
        if bounded.length < min_size {
            return Ok(MatchOutcome::NoMatch);
        }
        match self {
            Callback::Window(cfg) => {
                let key = (bounded.left, bounded.length);
                if let Some(cached) = memo.borrow().get(&key) {
                    return Ok(*cached);
                }
                let result = (cfg.callback)(data, bounded)
                    .map_err(|detail| MatchError::callback(path.to_vec(), detail))?;
                memo.borrow_mut().insert(key, result);
                Ok(result)
            }
            Callback::Element(cfg) => {
                let mut consumed = 0usize;
                while consumed < bounded.length
                    && (cfg.predicate)(data.seq_get(bounded.left + consumed))
                {
                    consumed += 1;
                }
                if consumed < min_size {
                    Ok(MatchOutcome::NoMatch)
                } else if consumed == 0 {
                    Ok(MatchOutcome::ZeroWidth)
                } else {
                    Ok(MatchOutcome::Consumed(consumed))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_atom(min: &str, max: &str, f: impl Fn(&Vec<i32>, Window) -> CallbackResult + 'static) -> Callback<Vec<i32>> {
        Callback::Window(WindowCallbackConfig {
            name: None,
            quant: QuantSpec::new(min, max).unwrap(),
            callback: Rc::new(f),
            subset_name: None,
        })
    }

    #[test]
    fn element_callback_consumes_greedily() {
        let atom: Callback<Vec<i32>> = Callback::Element(ElementCallbackConfig {
            name: None,
            quant: QuantSpec::new("0", "100%").unwrap(),
            predicate: Rc::new(|x: &i32| *x % 2 == 0),
            subset_name: None,
        });
        let data: Vec<i32> = vec![2, 4, 6, 7, 8];
        let (min, max) = atom.prep(data.len());
        let memo = RefCell::new(HashMap::new());
        let out = atom
            .apply(&data, Window::new(0, data.len()), min, max, &memo, None, &[])
            .unwrap();
        assert_eq!(out, MatchOutcome::Consumed(3));
    }

    #[test]
    fn window_callback_memoizes_by_window() {
        let calls = Rc::new(RefCell::new(0));
        let calls2 = calls.clone();
        let atom = window_atom("0", "100%", move |_data, w| {
            *calls2.borrow_mut() += 1;
            Ok(MatchOutcome::Consumed(w.length))
        });
        let data: Vec<i32> = vec![1, 2, 3];
        let (min, max) = atom.prep(data.len());
        let memo = RefCell::new(HashMap::new());
        atom.apply(&data, Window::new(0, 3), min, max, &memo, None, &[]).unwrap();
        atom.apply(&data, Window::new(0, 3), min, max, &memo, None, &[]).unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn window_callback_error_becomes_match_error() {
        let atom = window_atom("0", "100%", |_data, _w| Err("boom".to_string()));
        let data: Vec<i32> = vec![1, 2, 3];
        let (min, max) = atom.prep(data.len());
        let memo = RefCell::new(HashMap::new());
        let err = atom
            .apply(&data, Window::new(0, 3), min, max, &memo, None, &["root".into()])
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn subset_name_redirects_to_the_named_container() {
        let atom = Callback::Window(WindowCallbackConfig {
            name: None,
            quant: QuantSpec::new("0", "100%").unwrap(),
            callback: Rc::new(|data: &Vec<i32>, w: Window| Ok(MatchOutcome::Consumed(w.length.min(data.len())))),
            subset_name: Some("volume".to_string()),
        });
        let primary: Vec<i32> = vec![1, 1, 1];
        let volume: Vec<i32> = vec![9, 9];
        let named = NamedData::new(&primary).insert("volume", &volume);
        let (min, max) = atom.prep(primary.len());
        let memo = RefCell::new(HashMap::new());
        let out = atom
            .apply(&primary, Window::new(0, 3), min, max, &memo, Some(&named), &[])
            .unwrap();
        assert_eq!(out, MatchOutcome::Consumed(2), "callback should see `volume`'s own length, not the primary's");
    }
}
