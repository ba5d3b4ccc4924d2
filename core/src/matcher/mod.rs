//! # Pattern matching on formulas and terms
//!
//! A matcher takes a node and a partial result, and returns every way to
//! extend the result so the node matches. No result means no match.

pub mod formula;
pub mod replace;
pub mod result;
pub mod term;
pub mod util;

pub use formula::FormulaMatcher;
pub use replace::{instantiate, replace_all, replace_one, template, Replacer};
pub use result::{MatchResult, RefFormula};
pub use term::TermMatcher;

/// A pattern on nodes of type `N`.
pub trait Matcher<N> {
    /// All extensions of `prev` under which `node` matches.
    fn match_(&self, node: &N, prev: &MatchResult) -> Vec<MatchResult>;

    /// `match_` from each of `prevs`.
    fn match_all(&self, node: &N, prevs: &[MatchResult]) -> Vec<MatchResult> {
        prevs.iter().flat_map(|p| self.match_(node, p)).collect()
    }
}
