/*!
Leaf pattern nodes: the four atom kinds named in §4.3/§4.8. Concrete
numeric-interval, local-extremum, and per-element-regex atoms remain out
of scope (§1, §6) — they would be ordinary [`callback::Callback`] users
built on top of this module, not additions to it.
*/

pub mod any;
pub mod callback;
pub mod zerowidth;

pub use any::{Any, AnyConfig};
pub use callback::{Callback, ElementCallbackConfig, WindowCallbackConfig};
pub use zerowidth::{
    PositionAssertion, PositionAssertionConfig, PositionSpec, SubroutineAssertion,
    SubroutineAssertionConfig,
};
