//! Bundled demonstration grammars, used by the test suite and handy as starting points.
//!
//! Each submodule exposes a rule set and a ready-made parsing table for a small domain:
//! [arithmetic] picks a float addition out of arbitrary filler, [paper] is the classic
//! natural-language grammar from the GLR literature, and [intents] extracts a purchase
//! intent from free-form utterances.
pub mod arithmetic;
pub mod intents;
pub mod paper;

#[cfg(test)]
mod __tests__;
